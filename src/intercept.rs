//! Header mutation for intercepted requests.
//!
//! Kept free of network I/O so the exact header semantics are testable in
//! isolation; [`crate::OAuthSession`] wires these helpers to the token
//! lifecycle.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;

use crate::error::AuthError;
use crate::reporter::Reporter;
use crate::token::TokenRecord;

// Cookie-session identity headers; they conflict with bearer auth.
const COOKIE_SESSION_HEADERS: &[&str] = &["X-Goog-PageId", "X-Goog-AuthUser"];
// Sent alongside cookie-derived Authorization.
const ORIGIN_HEADER: &str = "X-Origin";
// No longer consumed by the service.
const DEPRECATED_IDENTITY_HEADER: &str = "X-Youtube-Identity-Token";

/// Whether a request URL targets the protected service.
pub fn is_protected_host(url: &Url, domain_suffix: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.ends_with(domain_suffix))
}

/// Strip conflicting headers and inject the bearer credential.
///
/// A pre-existing `Authorization` header means the caller also supplied
/// cookies; that combination is unsupported, so it is warned about and
/// replaced along with its companion origin header.
pub fn apply_bearer(
    headers: &mut HeaderMap,
    record: &TokenRecord,
    reporter: &dyn Reporter,
) -> Result<(), AuthError> {
    for name in COOKIE_SESSION_HEADERS {
        headers.remove(*name);
    }
    if headers.contains_key(AUTHORIZATION) {
        reporter.warn(
            "YouTube cookies have been provided, but OAuth2 is being used. \
             If you encounter problems, stop providing YouTube cookies.",
        );
        headers.remove(AUTHORIZATION);
        headers.remove(ORIGIN_HEADER);
    }
    headers.remove(DEPRECATED_IDENTITY_HEADER);

    let value = HeaderValue::from_str(&record.authorization_value()).map_err(|_| {
        AuthError::InvalidResponse(
            "Access token contains characters not valid in a header".to_string(),
        )
    })?;
    headers.insert(AUTHORIZATION, value);
    Ok(())
}
