use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Seconds of remaining lifetime below which a token counts as expired.
pub(crate) const EXPIRY_LEEWAY_SECS: i64 = 60;

/// A complete OAuth2 token as issued by the token endpoint.
///
/// Records are replaced wholesale on refresh, never partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Opaque bearer credential.
    pub access_token: String,
    pub refresh_token: String,
    /// Authorization scheme, e.g. `Bearer`.
    pub token_type: String,
    /// Absolute UNIX timestamp (seconds, UTC) when the access token expires.
    pub expires: i64,
}

impl TokenRecord {
    /// Build a record from token-endpoint fields, converting the relative
    /// `expires_in` into an absolute timestamp.
    pub fn from_grant(
        access_token: String,
        token_type: String,
        refresh_token: String,
        expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type,
            expires: Utc::now().timestamp() + expires_in,
        }
    }

    /// Whether the access token is still usable, with a 60-second leeway.
    pub fn is_current(&self) -> bool {
        self.expires >= Utc::now().timestamp() + EXPIRY_LEEWAY_SECS
    }

    /// `Authorization` header value, `"{token_type} {access_token}"`.
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// The cache-side shape of a token record.
///
/// A cache written by an older version or edited by hand may be missing
/// fields, so everything is optional here; [`StoredToken::validate`] is the
/// gate back into a [`TokenRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires: Option<i64>,
}

impl StoredToken {
    /// True iff all four required fields are present.
    pub fn validate(&self) -> bool {
        self.access_token.is_some()
            && self.expires.is_some()
            && self.refresh_token.is_some()
            && self.token_type.is_some()
    }

    /// Convert into a full record; `None` if any field is missing.
    pub fn into_record(self) -> Option<TokenRecord> {
        Some(TokenRecord {
            access_token: self.access_token?,
            refresh_token: self.refresh_token?,
            token_type: self.token_type?,
            expires: self.expires?,
        })
    }
}

impl From<&TokenRecord> for StoredToken {
    fn from(record: &TokenRecord) -> Self {
        Self {
            access_token: Some(record.access_token.clone()),
            refresh_token: Some(record.refresh_token.clone()),
            token_type: Some(record.token_type.clone()),
            expires: Some(record.expires),
        }
    }
}
