//! Steam Proxy - caching proxy for Steam storefront app details
//!
//! Serves `/api/appdetails` from a disk cache, falling back to the storefront
//! on a miss, and `/api/steamapps/getapplist/v2` from a static list.

use clap::Parser;
use tracing::{info, warn};

use steam_proxy::cache::CacheManager;
use steam_proxy::cli::{Cli, ProxyConfig};
use steam_proxy::data::{AppDetailsService, AppListProvider, StorefrontClient};
use steam_proxy::server::{self, AppState};
use steam_proxy::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match ProxyConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    telemetry::init_telemetry();
    info!("Starting steam-proxy v{}", env!("CARGO_PKG_VERSION"));

    let cache = CacheManager::with_dir(config.cache_dir.clone());
    if let Err(e) = cache.ensure_ready().await {
        warn!(
            cache_dir = %cache.dir().display(),
            error = %e,
            "Could not create cache directory, cache writes will fail"
        );
    }

    let storefront = StorefrontClient::with_base_url(&config.upstream_url, config.upstream_timeout)?;
    let app_list = match &config.app_list {
        Some(path) => AppListProvider::from_file(path)?,
        None => AppListProvider::default(),
    };
    info!(apps = app_list.list_all().total, "App list loaded");

    let state = AppState::new(AppDetailsService::new(cache, storefront), app_list);
    server::serve(&config, state).await?;

    Ok(())
}
