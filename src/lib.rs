//! yt-oauth2 — OAuth2 device-grant login for YouTube clients.
//!
//! Implements the OAuth2 device authorization grant against Google's
//! endpoints as a substitute for cookie-based authentication: an
//! interactive device-code flow when no credentials exist, persistent
//! token caching across runs, transparent refresh of expired tokens,
//! and bearer-credential injection into outgoing requests.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use yt_oauth2::{OAuthCapable, OAuthConfig, OAuthSession};
//! use yt_oauth2::reporter::ConsoleReporter;
//! use yt_oauth2::store::FileTokenStore;
//!
//! # async fn example() -> Result<(), yt_oauth2::AuthError> {
//! let store = Arc::new(FileTokenStore::new_default());
//! let mut session = OAuthSession::new(OAuthConfig::default(), store, Arc::new(ConsoleReporter));
//! session.perform_login("oauth2", "").await?;
//!
//! let mut request = reqwest::Request::new(
//!     reqwest::Method::GET,
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ".parse().unwrap(),
//! );
//! session.handle_request(&mut request).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod device_code;
pub mod error;
pub mod intercept;
pub mod refresh;
pub mod reporter;
pub mod session;
pub mod store;
pub mod token;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::OAuthConfig;
pub use device_code::{DeviceCodeSession, DeviceFlow, DevicePoll};
pub use error::AuthError;
pub use refresh::TokenRefresher;
pub use reporter::Reporter;
pub use session::{OAuthCapable, OAuthSession};
pub use store::{FileTokenStore, TokenStore};
pub use token::{StoredToken, TokenRecord};
