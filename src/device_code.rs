//! Device authorization grant (RFC 8628) against Google's endpoints.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OAuthConfig;
use crate::error::AuthError;
use crate::reporter::Reporter;
use crate::token::TokenRecord;

pub(crate) const DEVICE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// One authorization attempt, as returned by the device-code endpoint.
///
/// Transient: lives only until the attempt completes or the device code
/// expires server-side.
#[derive(Debug, Clone)]
pub struct DeviceCodeSession {
    pub device_code: String,
    /// Short code the user types in at `verification_url`.
    pub user_code: String,
    pub verification_url: String,
    /// Poll period in seconds.
    pub interval_secs: u64,
    /// Server-side lifetime of the device code, in seconds.
    pub expires_in: u64,
}

/// Outcome of a single poll of the token endpoint.
#[derive(Debug, Clone)]
pub enum DevicePoll {
    /// User has not entered the code yet; poll again after the interval.
    Pending { interval_secs: u64 },
    /// The device code expired before the user authorized; start over.
    Expired,
    Authorized { record: TokenRecord },
}

/// Drives the device-code request/poll protocol.
///
/// [`DeviceFlow::authorize`] blocks (in async terms) for the full duration
/// of user interaction plus polling; do not call it from a context that
/// cannot tolerate multi-minute waits.
#[derive(Clone)]
pub struct DeviceFlow {
    client: reqwest::Client,
    config: OAuthConfig,
    reporter: Arc<dyn Reporter>,
}

impl DeviceFlow {
    pub fn new(config: OAuthConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            reporter,
        }
    }

    /// Request a fresh device code, starting one authorization attempt.
    pub async fn request_device_code(&self) -> Result<DeviceCodeSession, AuthError> {
        debug!("requesting device code");
        let resp = self
            .client
            .post(&self.config.device_code_url)
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept", "application/json")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("If-Match", "*")
            .json(&DeviceCodeRequest {
                client_id: &self.config.client_id,
                scope: &self.config.scope,
            })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "Device code request failed with status {}",
                resp.status()
            )));
        }
        let payload: DeviceCodeResponse = resp.json().await?;
        Ok(DeviceCodeSession {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_url: payload.verification_url,
            interval_secs: payload.interval,
            expires_in: payload.expires_in,
        })
    }

    /// Poll the token endpoint once for the given session.
    ///
    /// `authorization_pending` and `expired_token` come back as
    /// [`DevicePoll`] variants; any other error code is fatal.
    pub async fn poll_once(&self, session: &DeviceCodeSession) -> Result<DevicePoll, AuthError> {
        let resp = self
            .client
            .post(&self.config.token_url)
            .header("User-Agent", "Mozilla/5.0")
            .header("Accept-Language", "en-US,en;q=0.9")
            .json(&DeviceTokenRequest {
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                device_code: &session.device_code,
                grant_type: DEVICE_GRANT_TYPE,
            })
            .send()
            .await?;
        // Google reports poll errors with a non-2xx status and a JSON body;
        // classification goes by the `error` field either way.
        let status = resp.status();
        let body = resp.bytes().await?;
        let payload: TokenEndpointResponse = serde_json::from_slice(&body).map_err(|_| {
            AuthError::InvalidResponse(format!(
                "Token endpoint returned status {status} with an unparsable body"
            ))
        })?;
        match payload.error.as_deref() {
            Some("authorization_pending") => Ok(DevicePoll::Pending {
                interval_secs: session.interval_secs,
            }),
            Some("expired_token") => Ok(DevicePoll::Expired),
            Some(other) => Err(AuthError::OAuth(other.to_string())),
            None => {
                let record = payload.into_record(None)?;
                Ok(DevicePoll::Authorized { record })
            }
        }
    }

    /// Run the full interactive flow until the user authorizes or a fatal
    /// error occurs.
    ///
    /// An expired device code restarts the flow from a fresh device-code
    /// request; restarts are unbounded but counted in the debug log, as the
    /// pending retries are bounded upstream by the code's own `expires_in`.
    pub async fn authorize(&self) -> Result<TokenRecord, AuthError> {
        let mut attempt = 1u32;
        loop {
            let session = self.request_device_code().await?;
            debug!(attempt, device_code = %session.device_code, "starting device authorization");
            self.reporter.inform(&format!(
                "To give this client access to your account, go to  {}  and enter code  {}",
                session.verification_url, session.user_code
            ));
            loop {
                tokio::time::sleep(Duration::from_secs(session.interval_secs)).await;
                match self.poll_once(&session).await? {
                    DevicePoll::Pending { .. } => continue,
                    DevicePoll::Expired => {
                        self.reporter
                            .warn("The device code has expired, restarting authorization flow");
                        attempt += 1;
                        break;
                    }
                    DevicePoll::Authorized { record } => {
                        self.reporter.inform("Authorization successful");
                        return Ok(record);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct DeviceCodeRequest<'a> {
    client_id: &'a str,
    scope: &'a str,
}

#[derive(Debug, Serialize)]
struct DeviceTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    device_code: &'a str,
    grant_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeviceCodeResponse {
    device_code: String,
    user_code: String,
    verification_url: String,
    interval: u64,
    expires_in: u64,
}

/// Token-endpoint response shared by the device and refresh grants.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenEndpointResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub error: Option<String>,
}

impl TokenEndpointResponse {
    /// Build a [`TokenRecord`] from a successful response.
    ///
    /// `fallback_refresh_token` covers refresh responses where the server
    /// chose not to rotate the refresh token.
    pub(crate) fn into_record(
        self,
        fallback_refresh_token: Option<&str>,
    ) -> Result<TokenRecord, AuthError> {
        let access_token = self.access_token.ok_or_else(|| {
            AuthError::InvalidResponse("Token response missing access_token".to_string())
        })?;
        let token_type = self.token_type.ok_or_else(|| {
            AuthError::InvalidResponse("Token response missing token_type".to_string())
        })?;
        let expires_in = self.expires_in.ok_or_else(|| {
            AuthError::InvalidResponse("Token response missing expires_in".to_string())
        })?;
        let refresh_token = self
            .refresh_token
            .or_else(|| fallback_refresh_token.map(str::to_string))
            .ok_or_else(|| {
                AuthError::InvalidResponse("Token response missing refresh_token".to_string())
            })?;
        Ok(TokenRecord::from_grant(
            access_token,
            token_type,
            refresh_token,
            expires_in,
        ))
    }
}
