#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use wiremock::MockServer;
use yt_oauth2::reporter::Reporter;
use yt_oauth2::store::{TokenStore, CACHE_KEY, CACHE_NAMESPACE};
use yt_oauth2::{AuthError, OAuthConfig, StoredToken, TokenRecord};

/// Token cache backed by a hash map; mirrors the host cache contract.
#[derive(Default)]
pub struct InMemoryTokenStore {
    records: Mutex<HashMap<(String, String), StoredToken>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an arbitrary stored shape, including invalid partial records.
    pub fn seed(&self, namespace: &str, key: &str, stored: StoredToken) {
        self.records
            .lock()
            .expect("store lock poisoned")
            .insert((namespace.to_string(), key.to_string()), stored);
    }

    pub fn seed_record(&self, record: &TokenRecord) {
        self.seed(CACHE_NAMESPACE, CACHE_KEY, StoredToken::from(record));
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<StoredToken> {
        self.records
            .lock()
            .expect("store lock poisoned")
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    pub fn get_record(&self) -> Option<TokenRecord> {
        self.get(CACHE_NAMESPACE, CACHE_KEY)?.into_record()
    }

    pub fn remove_all(&self) {
        self.records.lock().expect("store lock poisoned").clear();
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<StoredToken>, AuthError> {
        Ok(self.get(namespace, key))
    }

    fn save(&self, namespace: &str, key: &str, record: &TokenRecord) -> Result<(), AuthError> {
        self.seed(namespace, key, StoredToken::from(record));
        Ok(())
    }

    fn clear(&self, namespace: &str, key: &str) -> Result<(), AuthError> {
        self.records
            .lock()
            .expect("store lock poisoned")
            .remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}

/// Captures inform/warn messages for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    informs: Mutex<Vec<String>>,
    warns: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn informs(&self) -> Vec<String> {
        self.informs.lock().expect("reporter lock poisoned").clone()
    }

    pub fn warns(&self) -> Vec<String> {
        self.warns.lock().expect("reporter lock poisoned").clone()
    }
}

impl Reporter for RecordingReporter {
    fn inform(&self, message: &str) {
        self.informs
            .lock()
            .expect("reporter lock poisoned")
            .push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warns
            .lock()
            .expect("reporter lock poisoned")
            .push(message.to_string());
    }
}

/// Config pointing every endpoint at the mock server.
pub fn test_config(server: &MockServer) -> OAuthConfig {
    OAuthConfig::default()
        .with_device_code_url(format!("{}/device/code", server.uri()))
        .with_token_url(format!("{}/token", server.uri()))
}

/// A valid record with an hour of lifetime left.
pub fn current_record(access_token: &str) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: "refresh-1".to_string(),
        token_type: "Bearer".to_string(),
        expires: Utc::now().timestamp() + 3600,
    }
}

/// A valid record inside the 60-second expiry leeway.
pub fn expiring_record(access_token: &str) -> TokenRecord {
    TokenRecord {
        expires: Utc::now().timestamp() + 30,
        ..current_record(access_token)
    }
}

pub fn reporter() -> Arc<RecordingReporter> {
    Arc::new(RecordingReporter::new())
}

pub fn store() -> Arc<InMemoryTokenStore> {
    Arc::new(InMemoryTokenStore::new())
}
