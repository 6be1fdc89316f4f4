//! HTTP server for the Steam proxy
//!
//! Wires the app details service and the app list provider into an axum
//! router, adds CORS, request tracing and a panic guard, and serves it until a
//! shutdown signal arrives.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppDetailsQuery, AppListResponse};

use axum::{response::IntoResponse, response::Response, routing::get, Router};
use std::any::Any;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::cli::ProxyConfig;
use crate::data::{AppDetailsService, AppListProvider};

/// State shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub app_details: Arc<AppDetailsService>,
    pub app_list: Arc<AppListProvider>,
}

impl AppState {
    pub fn new(app_details: AppDetailsService, app_list: AppListProvider) -> Self {
        Self {
            app_details: Arc::new(app_details),
            app_list: Arc::new(app_list),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/appdetails", get(routes::app_details))
        .route("/api/steamapps/getapplist/v2", get(routes::app_list))
        .route("/health", get(routes::health))
        .fallback(routes::fallback)
        .with_state(state);

    with_middleware(routes)
}

/// Applies the middleware stack shared by every route
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Turns a handler panic into a 500 with an `{"error": ..}` body
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal(message).into_response()
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn serve(config: &ProxyConfig, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.addr).await?;

    info!(
        addr = %listener.local_addr()?,
        cache_dir = %config.cache_dir.display(),
        upstream = %config.upstream_url,
        "Proxy server listening"
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => { info!("Received Ctrl+C"); }
                    _ = sigterm.recv() => { info!("Received SIGTERM"); }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to register SIGTERM handler");
                ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    info!("Shutting down");
}
