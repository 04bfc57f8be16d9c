//! Token lifecycle orchestration and request interception.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::config::OAuthConfig;
use crate::device_code::DeviceFlow;
use crate::error::AuthError;
use crate::intercept;
use crate::refresh::TokenRefresher;
use crate::reporter::Reporter;
use crate::store::{TokenStore, CACHE_KEY, CACHE_NAMESPACE};
use crate::token::TokenRecord;

// Creator clients do not support OAuth; mweb does and must be added.
const OAUTH2_UNSUPPORTED_CLIENTS: &[&str] = &["web_creator", "android_creator", "ios_creator"];
const OAUTH2_CLIENTS: &[&str] = &["mweb"];

/// Capability seam for client types that can log in with OAuth2.
///
/// Compose this into a client by delegating to an owned [`OAuthSession`]
/// rather than inheriting behavior; the session carries all mutable login
/// state explicitly.
#[async_trait]
pub trait OAuthCapable {
    /// Handle a login request. Returns `true` when the credentials selected
    /// OAuth2 and login ran; `false` means the caller should fall back to
    /// its own login mechanism.
    async fn perform_login(&mut self, username: &str, password: &str) -> Result<bool, AuthError>;

    /// Whether a validated token is available without network I/O.
    fn is_authenticated(&self) -> bool;

    /// Intercept an outbound request, injecting bearer credentials when it
    /// targets the protected service.
    async fn handle_request(&self, request: &mut reqwest::Request) -> Result<(), AuthError>;
}

/// Per-client login session: cache lookup, authorization, refresh,
/// persistence, and request interception.
///
/// One session owns the token state; concurrent callers must serialize
/// through a single session to keep at most one authorization in flight.
pub struct OAuthSession {
    store: Arc<dyn TokenStore>,
    flow: DeviceFlow,
    refresher: TokenRefresher,
    reporter: Arc<dyn Reporter>,
    protected_domain: String,
    /// In-memory copy of the persisted record.
    cached: Mutex<Option<TokenRecord>>,
    /// Set when the user opts into OAuth2 login; gates interception.
    use_oauth2: bool,
}

impl OAuthSession {
    pub fn new(
        config: OAuthConfig,
        store: Arc<dyn TokenStore>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            flow: DeviceFlow::new(config.clone(), reporter.clone()),
            refresher: TokenRefresher::new(config.clone(), reporter.clone()),
            store,
            reporter,
            protected_domain: config.protected_domain,
            cached: Mutex::new(None),
            use_oauth2: false,
        }
    }

    /// Produce a usable token: cached if current, refreshed if near expiry,
    /// freshly authorized if absent or invalid.
    ///
    /// After this returns, the record is persisted and not within 60
    /// seconds of expiry, barring a server that issues one already
    /// expiring.
    pub async fn initialize(&self) -> Result<TokenRecord, AuthError> {
        let record = match self.cached_record() {
            Some(record) => Some(record),
            None => self.load_stored()?,
        };

        let mut record = match record {
            Some(record) => record,
            None => {
                let record = self.flow.authorize().await?;
                self.persist(&record)?;
                record
            }
        };

        if !record.is_current() {
            self.reporter.inform("Access token expired, refreshing");
            record = self.refresher.refresh(&record.refresh_token).await?;
            self.persist(&record)?;
        }

        Ok(record)
    }

    fn cached_record(&self) -> Option<TokenRecord> {
        self.cached.lock().ok()?.clone()
    }

    /// Load from the persistent store, discarding records that fail
    /// validation.
    fn load_stored(&self) -> Result<Option<TokenRecord>, AuthError> {
        let Some(stored) = self.store.load(CACHE_NAMESPACE, CACHE_KEY)? else {
            return Ok(None);
        };
        if !stored.validate() {
            self.reporter.warn("Invalid cached OAuth2 token data");
            return Ok(None);
        }
        Ok(stored.into_record())
    }

    fn persist(&self, record: &TokenRecord) -> Result<(), AuthError> {
        self.store.save(CACHE_NAMESPACE, CACHE_KEY, record)?;
        if let Ok(mut cached) = self.cached.lock() {
            *cached = Some(record.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl OAuthCapable for OAuthSession {
    async fn perform_login(&mut self, username: &str, _password: &str) -> Result<bool, AuthError> {
        if username != "oauth2" {
            return Ok(false);
        }
        debug!("OAuth2 login selected");
        self.use_oauth2 = true;
        self.initialize().await?;
        Ok(true)
    }

    fn is_authenticated(&self) -> bool {
        if !self.use_oauth2 {
            return false;
        }
        if self.cached_record().is_some() {
            return true;
        }
        matches!(
            self.store.load(CACHE_NAMESPACE, CACHE_KEY),
            Ok(Some(stored)) if stored.validate()
        )
    }

    async fn handle_request(&self, request: &mut reqwest::Request) -> Result<(), AuthError> {
        if !self.use_oauth2 {
            return Ok(());
        }
        if !intercept::is_protected_host(request.url(), &self.protected_domain) {
            return Ok(());
        }
        let record = self.initialize().await?;
        intercept::apply_bearer(request.headers_mut(), &record, self.reporter.as_ref())
    }
}

/// Adjust an innertube client list for OAuth2: drop the creator clients
/// that reject bearer auth and append the ones it requires.
pub fn adjust_innertube_clients(clients: &[String]) -> Vec<String> {
    let mut adjusted: Vec<String> = clients
        .iter()
        .filter(|client| !OAUTH2_UNSUPPORTED_CLIENTS.contains(&client.as_str()))
        .cloned()
        .collect();
    for client in OAUTH2_CLIENTS {
        if !adjusted.iter().any(|existing| existing == client) {
            adjusted.push((*client).to_string());
        }
    }
    adjusted
}
