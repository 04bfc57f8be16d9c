//! OAuth2 client configuration.

// YouTube TV (TVHTML5) device client.
const DEFAULT_CLIENT_ID: &str =
    "861556708454-d6dlm3lh05idd8npek18k6be8ba3oc68.apps.googleusercontent.com";
const DEFAULT_CLIENT_SECRET: &str = "SboVhoG9s0rNafixCSGGKXAT";
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/youtube";
const DEFAULT_DEVICE_CODE_URL: &str = "https://oauth2.googleapis.com/device/code";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_PROTECTED_DOMAIN: &str = "youtube.com";

/// Endpoints and client credentials for a device-grant login.
///
/// The default configuration targets YouTube through the TV client that
/// Google provisions for the device authorization grant. Every endpoint
/// can be overridden, which is how the test suite points the flows at a
/// local mock server.
///
/// # Example
/// ```
/// use yt_oauth2::OAuthConfig;
///
/// let config = OAuthConfig::default()
///     .with_token_url("http://127.0.0.1:9000/token");
/// assert_eq!(config.token_url, "http://127.0.0.1:9000/token");
/// ```
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub device_code_url: String,
    pub token_url: String,
    /// Requests whose host ends with this suffix get bearer credentials.
    pub protected_domain: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self::youtube_tv()
    }
}

impl OAuthConfig {
    pub fn youtube_tv() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            device_code_url: DEFAULT_DEVICE_CODE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            protected_domain: DEFAULT_PROTECTED_DOMAIN.to_string(),
        }
    }

    pub fn with_device_code_url(mut self, url: impl Into<String>) -> Self {
        self.device_code_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_protected_domain(mut self, domain: impl Into<String>) -> Self {
        self.protected_domain = domain.into();
        self
    }
}
