//! Cache module for storing upstream responses to disk
//!
//! This module provides a cache manager that persists app details payloads to the
//! filesystem, one JSON file per app id. Entries never expire: once a payload has
//! been written it is served in preference to the network until someone removes
//! the file by hand.

mod manager;

pub use manager::{CacheError, CacheManager};
