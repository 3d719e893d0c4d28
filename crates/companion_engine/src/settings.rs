use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Base URL used whenever no stored value can be read.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings store unavailable: {0}")]
    Store(String),
}

/// Asynchronous source of the backend base URL.
///
/// The engine never talks to a storage mechanism directly; embedders inject
/// a provider at client construction. A provider error is not fatal anywhere:
/// callers fall back to [`DEFAULT_BASE_URL`].
#[async_trait::async_trait]
pub trait BaseUrlProvider: Send + Sync {
    async fn base_url(&self) -> Result<String, SettingsError>;
}

/// Fixed base URL, for tests and embedders that resolve it themselves.
#[derive(Debug, Clone)]
pub struct StaticBaseUrl {
    url: String,
}

impl StaticBaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait::async_trait]
impl BaseUrlProvider for StaticBaseUrl {
    async fn base_url(&self) -> Result<String, SettingsError> {
        Ok(self.url.clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    backend_url: Option<String>,
}

/// Base URL persisted in a small JSON file.
///
/// Reading never fails: a missing, unreadable, or malformed store yields
/// [`DEFAULT_BASE_URL`] silently, matching the behavior of a browser profile
/// without synced storage.
#[derive(Debug, Clone)]
pub struct StoredBaseUrl {
    path: PathBuf,
}

impl StoredBaseUrl {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> String {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                engine_logging::engine_debug!(
                    "settings store {} unreadable ({err}); using default base url",
                    self.path.display()
                );
                return DEFAULT_BASE_URL.to_string();
            }
        };
        let stored: StoredSettings = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                engine_logging::engine_warn!(
                    "settings store {} malformed ({err}); using default base url",
                    self.path.display()
                );
                return DEFAULT_BASE_URL.to_string();
            }
        };
        match stored.backend_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Persists the base URL atomically: temp file in the same directory,
    /// then rename over the target.
    pub fn save(&self, url: &str) -> Result<(), SettingsError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|err| SettingsError::Store(err.to_string()))?;

        let stored = StoredSettings {
            backend_url: Some(url.to_string()),
        };
        let body = serde_json::to_string_pretty(&stored)
            .map_err(|err| SettingsError::Store(err.to_string()))?;

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|err| SettingsError::Store(err.to_string()))?;
        tmp.write_all(body.as_bytes())
            .map_err(|err| SettingsError::Store(err.to_string()))?;
        tmp.flush()
            .map_err(|err| SettingsError::Store(err.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|err| SettingsError::Store(err.to_string()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BaseUrlProvider for StoredBaseUrl {
    async fn base_url(&self) -> Result<String, SettingsError> {
        Ok(self.load())
    }
}

/// Resolves a provider to a usable base URL, falling back to the default on
/// error or on a blank value, with any trailing slash trimmed.
pub(crate) async fn resolve_base_url(provider: &dyn BaseUrlProvider) -> String {
    let url = match provider.base_url().await {
        Ok(url) if !url.trim().is_empty() => url,
        Ok(_) => DEFAULT_BASE_URL.to_string(),
        Err(err) => {
            engine_logging::engine_warn!("base url provider failed ({err}); using default");
            DEFAULT_BASE_URL.to_string()
        }
    };
    url.trim_end_matches('/').to_string()
}
