use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::token::{StoredToken, TokenRecord};

/// Cache namespace under which the token record is persisted.
pub const CACHE_NAMESPACE: &str = "youtube-oauth2";
/// Cache key under which the token record is persisted.
pub const CACHE_KEY: &str = "token_data";

/// Persistent key-value cache for token records.
///
/// `load` returns the loosely-typed [`StoredToken`] so callers can run
/// validation on records written by other versions; `save` only accepts a
/// complete [`TokenRecord`].
pub trait TokenStore: Send + Sync {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<StoredToken>, AuthError>;
    fn save(&self, namespace: &str, key: &str, record: &TokenRecord) -> Result<(), AuthError>;
    fn clear(&self, namespace: &str, key: &str) -> Result<(), AuthError>;
}

/// File-backed token store using TOML files.
///
/// # Example
/// ```no_run
/// use yt_oauth2::store::{FileTokenStore, TokenStore, CACHE_KEY, CACHE_NAMESPACE};
/// use yt_oauth2::TokenRecord;
///
/// let store = FileTokenStore::new_default();
/// let record = TokenRecord {
///     access_token: "access".to_string(),
///     refresh_token: "refresh".to_string(),
///     token_type: "Bearer".to_string(),
///     expires: 4_102_444_800,
/// };
/// store.save(CACHE_NAMESPACE, CACHE_KEY, &record)?;
/// # Ok::<(), yt_oauth2::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn new_default() -> Self {
        Self {
            base_dir: default_cache_dir(),
        }
    }

    fn record_path(&self, namespace: &str, key: &str) -> PathBuf {
        let namespace = normalize_label(namespace);
        let key = normalize_label(key);
        self.base_dir.join(format!("{namespace}.{key}.toml"))
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self, namespace: &str, key: &str) -> Result<Option<StoredToken>, AuthError> {
        let path = self.record_path(namespace, key);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        Ok(Some(file.token))
    }

    fn save(&self, namespace: &str, key: &str, record: &TokenRecord) -> Result<(), AuthError> {
        let path = self.record_path(namespace, key);
        Self::ensure_parent(&path)?;
        let file = TokenFile {
            version: 1,
            namespace: namespace.to_string(),
            key: key.to_string(),
            token: StoredToken::from(record),
            saved_at: Utc::now(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self, namespace: &str, key: &str) -> Result<(), AuthError> {
        let path = self.record_path(namespace, key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    namespace: String,
    key: String,
    token: StoredToken,
    saved_at: DateTime<Utc>,
}

fn default_cache_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".yt-oauth2"))
        .unwrap_or_else(|| PathBuf::from(".yt-oauth2"))
}

fn normalize_label(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "default".to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '-' {
            out.push(lower);
        } else {
            out.push('-');
        }
    }
    if out.trim_matches('-').is_empty() {
        "default".to_string()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn sample_record() -> TokenRecord {
        TokenRecord {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "Bearer".to_string(),
            expires: 4_102_444_800,
        }
    }

    #[test]
    fn record_round_trip_works() {
        let (_dir, store) = temp_store();
        store
            .save(CACHE_NAMESPACE, CACHE_KEY, &sample_record())
            .unwrap();
        let loaded = store.load(CACHE_NAMESPACE, CACHE_KEY).unwrap().unwrap();
        assert!(loaded.validate());
        assert_eq!(loaded.into_record().unwrap(), sample_record());
    }

    #[test]
    fn load_returns_none_for_missing_entry() {
        let (_dir, store) = temp_store();
        assert!(store.load(CACHE_NAMESPACE, CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_removes_record() {
        let (_dir, store) = temp_store();
        store
            .save(CACHE_NAMESPACE, CACHE_KEY, &sample_record())
            .unwrap();
        store.clear(CACHE_NAMESPACE, CACHE_KEY).unwrap();
        assert!(store.load(CACHE_NAMESPACE, CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.clear(CACHE_NAMESPACE, CACHE_KEY).unwrap();
    }

    #[test]
    fn load_surfaces_partial_records_for_validation() {
        let (dir, store) = temp_store();
        let contents = concat!(
            "version = 1\n",
            "namespace = \"youtube-oauth2\"\n",
            "key = \"token_data\"\n",
            "saved_at = \"2024-01-01T00:00:00Z\"\n",
            "\n",
            "[token]\n",
            "access_token = \"access\"\n",
            "token_type = \"Bearer\"\n",
        );
        fs::write(dir.path().join("youtube-oauth2.token-data.toml"), contents).unwrap();
        let loaded = store.load(CACHE_NAMESPACE, CACHE_KEY).unwrap().unwrap();
        assert!(!loaded.validate());
        assert_eq!(loaded.access_token.as_deref(), Some("access"));
        assert!(loaded.refresh_token.is_none());
    }

    #[test]
    fn normalize_label_replaces_unsupported_characters() {
        assert_eq!(normalize_label("token_data"), "token-data");
        assert_eq!(normalize_label("  "), "default");
        assert_eq!(normalize_label("Youtube-OAuth2"), "youtube-oauth2");
    }
}
