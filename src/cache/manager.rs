//! Cache manager for persisting upstream responses to disk
//!
//! Provides a `CacheManager` that stores raw JSON payloads as `<appid>.json`
//! files under a cache root directory.

use directories::ProjectDirs;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::data::AppId;

/// Errors that can occur when reading or writing cache entries
#[derive(Debug, Error)]
pub enum CacheError {
    /// No entry exists for the requested id
    #[error("No cache entry for app {0}")]
    NotFound(AppId),

    /// The entry exists but does not contain valid JSON
    #[error("Corrupt cache entry for app {id}: {source}")]
    Corrupt {
        id: AppId,
        #[source]
        source: serde_json::Error,
    },

    /// Payload could not be serialized for writing
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Any other filesystem failure
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Manages reading and writing cached payloads to disk
///
/// Every read and write goes straight to the filesystem; there is no in-memory
/// layer, so separate processes pointed at the same root share entries.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a CacheManager rooted at the XDG-compliant cache directory
    ///
    /// Uses `~/.cache/steam-proxy/` on Linux, or the equivalent path on other
    /// platforms. Returns `None` if no home directory can be determined.
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "steam-proxy")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the cache root
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to the cache file for the given id
    fn cache_path(&self, id: &AppId) -> PathBuf {
        self.cache_dir.join(format!("{}.json", id))
    }

    /// Creates the cache root if it does not exist yet
    ///
    /// Safe to call repeatedly. Callers at startup log the error and carry on;
    /// later writes will retry the directory creation themselves.
    pub async fn ensure_ready(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir).await?;
        Ok(())
    }

    /// Reads the cached payload for `id`
    ///
    /// # Returns
    /// * `Ok(Value)` if the entry exists and parses as JSON
    /// * `Err(CacheError::NotFound)` if there is no entry
    /// * `Err(CacheError::Corrupt)` if the entry is not valid JSON
    pub async fn read(&self, id: &AppId) -> Result<Value, CacheError> {
        let content = match fs::read(self.cache_path(id)).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CacheError::NotFound(id.clone()))
            }
            Err(e) => return Err(CacheError::Io(e)),
        };

        serde_json::from_slice(&content).map_err(|source| CacheError::Corrupt {
            id: id.clone(),
            source,
        })
    }

    /// Writes `payload` as the cache entry for `id`
    ///
    /// Creates the cache root if needed and silently replaces any existing
    /// entry. Concurrent writers to the same id race; the last one wins.
    pub async fn write(&self, id: &AppId, payload: &Value) -> Result<(), CacheError> {
        self.ensure_ready().await?;

        let json = serde_json::to_vec(payload).map_err(CacheError::Serialize)?;
        fs::write(self.cache_path(id), json).await?;
        Ok(())
    }

    /// Whether an entry file exists for `id`, valid or not
    pub async fn contains(&self, id: &AppId) -> bool {
        fs::try_exists(self.cache_path(id)).await.unwrap_or(false)
    }
}
