//! CLI command handlers for login, status, and logout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::config::OAuthConfig;
use crate::reporter::ConsoleReporter;
use crate::session::{OAuthCapable, OAuthSession};
use crate::store::{FileTokenStore, TokenStore, CACHE_KEY, CACHE_NAMESPACE};

/// yt-oauth2 CLI
#[derive(Parser, Debug)]
#[command(
    name = "yt-oauth2",
    version,
    about = "OAuth2 device-grant login for YouTube clients"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive device-code login
    Login,
    /// Show the cached token status
    Status,
    /// Remove the cached token
    Logout,
}

/// Handle `yt-oauth2 login`.
pub async fn handle_login() -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(FileTokenStore::new_default());
    let mut session = OAuthSession::new(OAuthConfig::default(), store, Arc::new(ConsoleReporter));
    session.perform_login("oauth2", "").await?;
    println!("Logged in");
    Ok(())
}

/// Handle `yt-oauth2 status`.
pub async fn handle_status() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileTokenStore::new_default();
    match store.load(CACHE_NAMESPACE, CACHE_KEY)? {
        Some(stored) => match stored.into_record() {
            Some(record) => match DateTime::<Utc>::from_timestamp(record.expires, 0) {
                Some(expires) if record.is_current() => {
                    println!("Logged in; access token expires at {expires}");
                }
                Some(expires) => {
                    println!("Logged in; access token expired at {expires} (will refresh on use)");
                }
                None => println!("Logged in; access token expiry is out of range"),
            },
            None => println!("Cached token data is invalid; run `yt-oauth2 login`"),
        },
        None => println!("Not logged in"),
    }
    Ok(())
}

/// Handle `yt-oauth2 logout`.
pub async fn handle_logout() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileTokenStore::new_default();
    store.clear(CACHE_NAMESPACE, CACHE_KEY)?;
    println!("Logged out");
    Ok(())
}
