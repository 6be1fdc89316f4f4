//! Command-line interface parsing for the Steam proxy
//!
//! This module handles parsing of CLI arguments using clap. Every flag can also
//! be set through an environment variable, so the proxy can be configured the
//! same way in a shell or a container.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::data::storefront::STEAM_APPDETAILS_URL;

/// Port used when neither `--port` nor `PORT` is given
pub const DEFAULT_PORT: u16 = 3001;

/// Cache root used when no platform cache directory can be found
const FALLBACK_CACHE_DIR: &str = "cache";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The upstream timeout must be at least one second
    #[error("Invalid timeout: {0}s. The upstream timeout must be greater than zero")]
    InvalidTimeout(u64),

    /// The upstream URL is not http(s)
    #[error("Invalid upstream URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidUpstreamUrl(String),
}

/// Steam proxy - caching proxy for Steam storefront app details
#[derive(Parser, Debug)]
#[command(name = "steam-proxy")]
#[command(about = "Caching proxy for Steam storefront app details")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "STEAM_PROXY_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Directory for cached app details (defaults to the platform cache dir)
    #[arg(long, env = "STEAM_PROXY_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Storefront app details endpoint
    #[arg(long, env = "STEAM_PROXY_UPSTREAM_URL", default_value = STEAM_APPDETAILS_URL)]
    pub upstream_url: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "STEAM_PROXY_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// JSON file replacing the built-in app list
    ///
    /// The file holds an array of app ids or `{"appid": .., "name": ..}` objects.
    #[arg(long, env = "STEAM_PROXY_APP_LIST", value_name = "FILE")]
    pub app_list: Option<PathBuf>,
}

/// Validated configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Socket address to bind
    pub addr: SocketAddr,
    /// Cache root directory
    pub cache_dir: PathBuf,
    /// Storefront app details endpoint
    pub upstream_url: String,
    /// Upstream request timeout
    pub upstream_timeout: Duration,
    /// Optional replacement app list
    pub app_list: Option<PathBuf>,
}

impl ProxyConfig {
    /// Creates a ProxyConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ProxyConfig)` with defaults filled in
    /// * `Err(CliError)` if the timeout or upstream URL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout(cli.timeout_secs));
        }
        if !(cli.upstream_url.starts_with("http://") || cli.upstream_url.starts_with("https://")) {
            return Err(CliError::InvalidUpstreamUrl(cli.upstream_url.clone()));
        }

        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => CacheManager::new()
                .map(|cache| cache.dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR)),
        };

        Ok(ProxyConfig {
            addr: SocketAddr::new(cli.host, cli.port),
            cache_dir,
            upstream_url: cli.upstream_url.clone(),
            upstream_timeout: Duration::from_secs(cli.timeout_secs),
            app_list: cli.app_list.clone(),
        })
    }
}
