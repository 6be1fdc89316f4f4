//! Core data models for the Steam proxy
//!
//! This module contains the types shared between the cache, the upstream
//! storefront client and the HTTP layer: app identifiers, app list records and
//! the outcome of resolving an app details lookup.

pub mod app_details;
pub mod app_list;
pub mod storefront;

pub use app_details::AppDetailsService;
pub use app_list::{AppList, AppListError, AppListProvider};
pub use storefront::{StorefrontClient, UpstreamError};

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Errors produced when validating an app identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppIdError {
    /// No identifier was supplied, or it was blank
    #[error("missing required query parameter: appids")]
    Missing,

    /// The identifier contains something other than ASCII digits
    #[error("invalid appids '{0}': expected an integer app id")]
    NotNumeric(String),
}

/// A Steam application identifier
///
/// Held as the digit string the client sent, so leading zeros and values
/// beyond `u32` pass through to the upstream untouched. Only ASCII digits are
/// accepted, which keeps every id a safe cache filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(String);

impl AppId {
    /// Validates and wraps a raw identifier
    ///
    /// Surrounding whitespace is trimmed. Blank input is `Missing`; anything
    /// that is not all digits is `NotNumeric`.
    pub fn parse(raw: &str) -> Result<Self, AppIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppIdError::Missing);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppIdError::NotNumeric(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as sent upstream and used for the cache filename
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for AppId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// A known application, optionally with its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Steam app id
    pub appid: u32,
    /// Human-readable name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AppRecord {
    /// Creates a record with a display name
    pub fn named(appid: u32, name: impl Into<String>) -> Self {
        Self {
            appid,
            name: Some(name.into()),
        }
    }

    /// Creates a record with only an id
    pub fn unnamed(appid: u32) -> Self {
        Self { appid, name: None }
    }
}

/// Outcome of resolving an app details lookup
///
/// `Cached` and `Fetched` carry the upstream payload verbatim. `Degraded`
/// stands in for a failed upstream call and serializes to the same shape the
/// storefront uses for an unknown app: `{"<id>": {"success": false, "data": null}}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Served from the disk cache
    Cached(Value),
    /// Fetched from the upstream and written to the cache
    Fetched(Value),
    /// Upstream failed; nothing was cached
    Degraded(AppId),
}

impl Resolution {
    /// Whether the upstream fetch failed
    #[cfg(test)]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Resolution::Degraded(_))
    }

    /// Converts into the JSON body returned to clients
    pub fn into_payload(self) -> Value {
        match self {
            Resolution::Cached(payload) | Resolution::Fetched(payload) => payload,
            Resolution::Degraded(id) => degraded_payload(&id),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Cached(payload) | Resolution::Fetched(payload) => {
                payload.serialize(serializer)
            }
            Resolution::Degraded(id) => degraded_payload(id).serialize(serializer),
        }
    }
}

/// Builds the placeholder body returned when the upstream fetch fails
pub fn degraded_payload(id: &AppId) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(
        id.as_str().to_string(),
        json!({ "success": false, "data": null }),
    );
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_accepts_digits() {
        let id = AppId::parse("730").unwrap();
        assert_eq!(id.as_str(), "730");
        assert_eq!(id.to_string(), "730");
    }

    #[test]
    fn test_app_id_trims_whitespace() {
        assert_eq!(AppId::parse("  570 ").unwrap().as_str(), "570");
    }

    #[test]
    fn test_app_id_rejects_blank() {
        assert_eq!(AppId::parse(""), Err(AppIdError::Missing));
        assert_eq!(AppId::parse("   "), Err(AppIdError::Missing));
    }

    #[test]
    fn test_app_id_rejects_path_traversal() {
        assert!(matches!(
            AppId::parse("../etc/passwd"),
            Err(AppIdError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_app_id_rejects_non_numeric() {
        let err = AppId::parse("abc").unwrap_err();
        assert!(err.to_string().contains("abc"));
        assert!(AppId::parse("730,570").is_err());
        assert!(AppId::parse("-1").is_err());
    }

    #[test]
    fn test_degraded_payload_shape() {
        let payload = degraded_payload(&AppId::parse("99999").unwrap());
        assert_eq!(
            payload,
            json!({"99999": {"success": false, "data": null}})
        );
    }

    #[test]
    fn test_resolution_serializes_like_payload() {
        let body = json!({"730": {"success": true, "data": {"name": "CS:GO"}}});

        let cached = serde_json::to_value(Resolution::Cached(body.clone())).unwrap();
        let fetched = serde_json::to_value(Resolution::Fetched(body.clone())).unwrap();

        assert_eq!(cached, body);
        assert_eq!(fetched, body);
    }

    #[test]
    fn test_resolution_degraded_serialization_matches_into_payload() {
        let resolution = Resolution::Degraded(AppId::from(440));
        assert!(resolution.is_degraded());

        let serialized = serde_json::to_value(&resolution).unwrap();
        assert_eq!(serialized, resolution.into_payload());
    }

    #[test]
    fn test_app_record_omits_missing_name() {
        let json = serde_json::to_value(AppRecord::unnamed(10)).unwrap();
        assert_eq!(json, json!({"appid": 10}));

        let json = serde_json::to_value(AppRecord::named(10, "Counter-Strike")).unwrap();
        assert_eq!(json, json!({"appid": 10, "name": "Counter-Strike"}));
    }
}
