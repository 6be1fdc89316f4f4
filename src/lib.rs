//! Steam Proxy Library
//!
//! A caching proxy in front of the Steam storefront `appdetails` API, plus a
//! static app list. Modules are exposed for the binary and integration tests.

pub mod cache;
pub mod cli;
pub mod data;
pub mod server;
pub mod telemetry;
