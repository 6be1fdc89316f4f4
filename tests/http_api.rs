//! Integration tests for the HTTP routes
//!
//! Drives the axum router directly with `oneshot`, using a wiremock server in
//! place of the storefront and a temp directory as the cache root.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use steam_proxy::cache::CacheManager;
use steam_proxy::data::{AppDetailsService, AppListProvider, AppRecord, StorefrontClient};
use steam_proxy::server::{create_router, with_middleware, AppState};

struct TestProxy {
    router: Router,
    upstream: MockServer,
    cache_dir: TempDir,
}

async fn test_proxy(app_list: AppListProvider) -> TestProxy {
    let upstream = MockServer::start().await;
    let cache_dir = TempDir::new().expect("Failed to create temp directory");

    let cache = CacheManager::with_dir(cache_dir.path().to_path_buf());
    let storefront = StorefrontClient::with_base_url(
        format!("{}/api/appdetails", upstream.uri()),
        Duration::from_secs(2),
    )
    .expect("client should build");

    let state = AppState::new(AppDetailsService::new(cache, storefront), app_list);

    TestProxy {
        router: create_router(state),
        upstream,
        cache_dir,
    }
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).expect("response should be JSON");
    (status, json)
}

#[tokio::test]
async fn test_app_details_fetches_then_serves_from_cache() {
    let proxy = test_proxy(AppListProvider::default()).await;
    let body = json!({"730": {"success": true, "data": {"name": "CS:GO"}}});

    Mock::given(method("GET"))
        .and(path("/api/appdetails"))
        .and(query_param("appids", "730"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&proxy.upstream)
        .await;

    let (status, first) = get_json(&proxy.router, "/api/appdetails?appids=730").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, body);
    assert!(proxy.cache_dir.path().join("730.json").exists());

    let (status, second) = get_json(&proxy.router, "/api/appdetails?appids=730").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second, body);
}

#[tokio::test]
async fn test_app_details_upstream_failure_is_degraded_200() {
    let proxy = test_proxy(AppListProvider::default()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&proxy.upstream)
        .await;

    let (status, body) = get_json(&proxy.router, "/api/appdetails?appids=99999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"99999": {"success": false, "data": null}}));
    assert!(!proxy.cache_dir.path().join("99999.json").exists());
}

#[tokio::test]
async fn test_app_details_serves_existing_cache_without_upstream() {
    let proxy = test_proxy(AppListProvider::default()).await;
    let stored = json!({"440": {"success": true, "data": {"name": "Team Fortress 2"}}});
    std::fs::write(
        proxy.cache_dir.path().join("440.json"),
        serde_json::to_string(&stored).unwrap(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&proxy.upstream)
        .await;

    let (status, body) = get_json(&proxy.router, "/api/appdetails?appids=440").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stored);
}

#[tokio::test]
async fn test_app_details_missing_appids_is_bad_request() {
    let proxy = test_proxy(AppListProvider::default()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&proxy.upstream)
        .await;

    let (status, body) = get_json(&proxy.router, "/api/appdetails").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("appids"));

    let (status, _) = get_json(&proxy.router, "/api/appdetails?appids=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_app_details_non_numeric_appids_is_bad_request() {
    let proxy = test_proxy(AppListProvider::default()).await;

    let (status, body) = get_json(&proxy.router, "/api/appdetails?appids=..%2F..%2Fetc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_app_list_total_matches_apps() {
    let proxy = test_proxy(AppListProvider::default()).await;

    let (status, body) = get_json(&proxy.router, "/api/steamapps/getapplist/v2").await;

    assert_eq!(status, StatusCode::OK);
    let apps = body["applist"]["apps"].as_array().expect("apps should be an array");
    assert!(!apps.is_empty());
    assert_eq!(body["applist"]["total"].as_u64().unwrap() as usize, apps.len());
}

#[tokio::test]
async fn test_app_list_custom_records() {
    let provider = AppListProvider::new(vec![AppRecord::unnamed(10), AppRecord::named(20, "Twenty")]);
    let proxy = test_proxy(provider).await;

    let (_, body) = get_json(&proxy.router, "/api/steamapps/getapplist/v2").await;

    assert_eq!(
        body,
        json!({"applist": {"apps": [{"appid": 10}, {"appid": 20, "name": "Twenty"}], "total": 2}})
    );
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let proxy = test_proxy(AppListProvider::default()).await;

    let (status, body) = get_json(&proxy.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = get_json(&proxy.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not found"}));
}

#[tokio::test]
async fn test_cors_headers_present() {
    let proxy = test_proxy(AppListProvider::default()).await;
    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = proxy.router.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_handler_panic_becomes_500_json() {
    async fn boom() -> &'static str {
        panic!("kaboom")
    }
    let router = with_middleware(Router::new().route("/boom", get(boom)));

    let (status, body) = get_json(&router, "/boom").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}
