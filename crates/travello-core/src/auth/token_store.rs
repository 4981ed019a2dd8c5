use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::KeyringTokenStore;

/// Fixed name of the persisted token entry
pub const TOKEN_KEY: &str = "authToken";

/// The single durable slot holding the current auth token.
///
/// Absence of a token means logged out. Implementations must be safe to share
/// between the session and the HTTP client.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    /// Remove the token. Clearing an empty slot is not an error.
    fn clear(&self) -> Result<()>;
}

/// Where the token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    #[default]
    File,
    Keyring,
}

/// Open the configured backend. File storage lives under `data_dir`.
pub fn open_token_store(backend: TokenBackend, data_dir: PathBuf) -> Arc<dyn TokenStore> {
    match backend {
        TokenBackend::File => Arc::new(FileTokenStore::new(data_dir)),
        TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Non-durable store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let guard = self.token.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut guard = self.token.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.token.lock().map_err(|_| anyhow!("Token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

/// On-disk form of the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    pub stored_at: DateTime<Utc>,
}

/// Token persisted as JSON in the data directory
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", TOKEN_KEY))
    }

    /// Load the token along with when it was stored
    pub fn load_entry(&self) -> Result<Option<StoredToken>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let entry: StoredToken =
            serde_json::from_str(&contents).context("Failed to parse token file")?;

        if entry.token.is_empty() {
            return Ok(None);
        }
        Ok(Some(entry))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.load_entry()?.map(|entry| entry.token))
    }

    fn save(&self, token: &str) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }

        let entry = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        debug!(path = %path.display(), "Token saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
            debug!(path = %path.display(), "Token removed");
        }
        Ok(())
    }
}
