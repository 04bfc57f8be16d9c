//! Refresh-grant exchange with device-flow fallback.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::OAuthConfig;
use crate::device_code::{DeviceFlow, TokenEndpointResponse};
use crate::error::AuthError;
use crate::reporter::Reporter;
use crate::token::TokenRecord;

const REFRESH_GRANT_TYPE: &str = "refresh_token";

/// Exchanges a refresh token for a new access token.
///
/// A refusal from the token endpoint is recoverable: the refresher warns
/// and hands control back to the interactive [`DeviceFlow`].
pub struct TokenRefresher {
    client: reqwest::Client,
    config: OAuthConfig,
    reporter: Arc<dyn Reporter>,
    flow: DeviceFlow,
}

impl TokenRefresher {
    pub fn new(config: OAuthConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client: reqwest::Client::new(),
            flow: DeviceFlow::new(config.clone(), reporter.clone()),
            config,
            reporter,
        }
    }

    /// Exchange `refresh_token` for a fresh record.
    ///
    /// The returned record keeps the original refresh token when the server
    /// does not rotate it. On an `error` response the full device flow runs
    /// instead, so this can block on user interaction.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, AuthError> {
        debug!("refreshing access token");
        let resp = self
            .client
            .post(&self.config.token_url)
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept-Language", "en-US,en;q=0.9")
            .json(&RefreshRequest {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                refresh_token,
                grant_type: REFRESH_GRANT_TYPE,
            })
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        let payload: TokenEndpointResponse = serde_json::from_slice(&body).map_err(|_| {
            AuthError::InvalidResponse(format!(
                "Token endpoint returned status {status} with an unparsable body"
            ))
        })?;
        if let Some(error) = payload.error {
            self.reporter.warn(&format!(
                "Failed to refresh access token: {error}. Restarting authorization flow"
            ));
            return self.flow.authorize().await;
        }
        payload.into_record(Some(refresh_token))
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
    grant_type: &'a str,
}
