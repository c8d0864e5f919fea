use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ServiceError;

const STORAGE_DIR: &str = ".notebooklm";
const STORAGE_FILE: &str = "storage_state.json";

#[derive(Debug, Clone, Deserialize)]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// Persisted browser session written by the service's login flow.
///
/// Only the cookie jar is read; other keys in the file are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
}

impl StorageState {
    /// `~/.notebooklm/storage_state.json`, or a relative path if no home directory is known.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(STORAGE_DIR).join(STORAGE_FILE))
            .unwrap_or_else(|| PathBuf::from(STORAGE_DIR).join(STORAGE_FILE))
    }

    pub async fn load(path: &Path) -> Result<Self, ServiceError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| storage_error(path, format!("cannot read session file: {e}")))?;

        let state: StorageState = serde_json::from_str(&raw)
            .map_err(|e| storage_error(path, format!("invalid session file: {e}")))?;

        if state.cookies.is_empty() {
            return Err(storage_error(path, "no cookies in session file, log in first".to_string()));
        }

        tracing::debug!(path = %path.display(), cookies = state.cookies.len(), "Loaded session storage");
        Ok(state)
    }

    /// Renders the jar as a single `Cookie` header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn storage_error(path: &Path, reason: String) -> ServiceError {
    ServiceError::Storage {
        path: path.to_path_buf(),
        reason,
    }
}
