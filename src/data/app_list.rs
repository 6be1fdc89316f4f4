//! Static list of known Steam applications
//!
//! This module holds the built-in app list served by the `getapplist/v2`
//! route, and loads replacement lists from JSON files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::AppRecord;

/// Built-in list of well-known Steam apps
///
/// Pairs of app id and store name.
pub static KNOWN_APPS: [(u32, &str); 15] = [
    (730, "Counter-Strike 2"),
    (570, "Dota 2"),
    (440, "Team Fortress 2"),
    (620, "Portal 2"),
    (271590, "Grand Theft Auto V"),
    (1172470, "Apex Legends"),
    (578080, "PUBG: BATTLEGROUNDS"),
    (292030, "The Witcher 3: Wild Hunt"),
    (1091500, "Cyberpunk 2077"),
    (1245620, "ELDEN RING"),
    (413150, "Stardew Valley"),
    (105600, "Terraria"),
    (252490, "Rust"),
    (359550, "Tom Clancy's Rainbow Six Siege"),
    (1086940, "Baldur's Gate 3"),
];

/// Errors that can occur when loading an app list file
#[derive(Debug, Error)]
pub enum AppListError {
    /// The file could not be read
    #[error("Failed to read app list {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of ids or records
    #[error("Failed to parse app list {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One entry in an app list file: a bare id or a full record
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AppListEntry {
    Id(u32),
    Record(AppRecord),
}

impl From<AppListEntry> for AppRecord {
    fn from(entry: AppListEntry) -> Self {
        match entry {
            AppListEntry::Id(appid) => AppRecord::unnamed(appid),
            AppListEntry::Record(record) => record,
        }
    }
}

/// Response body of the app list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppList {
    /// Every known app
    pub apps: Vec<AppRecord>,
    /// Always equal to `apps.len()`
    pub total: usize,
}

/// Serves a fixed set of app records
#[derive(Debug, Clone)]
pub struct AppListProvider {
    apps: Vec<AppRecord>,
}

impl Default for AppListProvider {
    fn default() -> Self {
        Self::new(
            KNOWN_APPS
                .iter()
                .map(|(appid, name)| AppRecord::named(*appid, *name))
                .collect(),
        )
    }
}

impl AppListProvider {
    /// Creates a provider over the given records
    pub fn new(apps: Vec<AppRecord>) -> Self {
        Self { apps }
    }

    /// Loads records from a JSON file
    ///
    /// The file holds an array whose items are either plain ids (`730`) or
    /// objects (`{"appid": 730, "name": "Counter-Strike 2"}`); both forms may
    /// be mixed.
    pub fn from_file(path: &Path) -> Result<Self, AppListError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| AppListError::Read {
            path: display.clone(),
            source,
        })?;
        let entries: Vec<AppListEntry> =
            serde_json::from_str(&content).map_err(|source| AppListError::Parse {
                path: display,
                source,
            })?;

        Ok(Self::new(entries.into_iter().map(AppRecord::from).collect()))
    }

    /// Returns every record along with the count
    pub fn list_all(&self) -> AppList {
        AppList {
            apps: self.apps.clone(),
            total: self.apps.len(),
        }
    }
}
