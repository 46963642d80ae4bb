//! HTTP account client against an in-process stub server.
//!
//! Spins up a minimal axum router standing in for the dashboard backend
//! and drives [`HttpAccountApi`] end to end: payload decoding, status
//! mapping, request paths/bodies, and the identity cache's absorption of
//! HTTP failures.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use secboard::config::ServerConfig;
use secboard::net::account::{AccountApi, AccountError, HttpAccountApi};
use secboard::net::types::Identity;
use secboard::state::auth::IdentityCache;
use secboard::state::storage::StateStorage;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("secboard=debug").try_init();
}

/// Requests captured by the stub backend, keyed by endpoint.
#[derive(Default)]
struct Captured {
    saved: Mutex<Vec<Value>>,
    reset_init: Mutex<Vec<Value>>,
    reset_finish: Mutex<Vec<Value>>,
}

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> HttpAccountApi {
    HttpAccountApi::new(ServerConfig::new(base_url)).unwrap()
}

// =============================================================================
// fetch_account
// =============================================================================

#[tokio::test]
async fn fetch_account_decodes_the_account_payload() {
    init_tracing();
    let app = Router::new().route(
        "/api/account",
        get(|| async {
            Json(json!({
                "login": "admin",
                "activated": true,
                "authorities": ["ROLE_ADMIN", "ROLE_USER"],
                "firstName": "Ada",
                "langKey": "en"
            }))
        }),
    );
    let base = spawn_backend(app).await;

    let account = client_for(&base).fetch_account().await.unwrap();
    assert_eq!(account.login, "admin");
    assert_eq!(account.first_name.as_deref(), Some("Ada"));
    assert!(account.has_authority("ROLE_ADMIN"));
}

#[tokio::test]
async fn fetch_account_maps_401_to_status_error() {
    init_tracing();
    let app = Router::new().route("/api/account", get(|| async { StatusCode::UNAUTHORIZED }));
    let base = spawn_backend(app).await;

    let err = client_for(&base).fetch_account().await.unwrap_err();
    assert!(matches!(err, AccountError::Status { status: 401 }));
}

#[tokio::test]
async fn fetch_account_maps_bad_body_to_parse_error() {
    init_tracing();
    let app = Router::new().route("/api/account", get(|| async { "not json" }));
    let base = spawn_backend(app).await;

    let err = client_for(&base).fetch_account().await.unwrap_err();
    assert!(matches!(err, AccountError::Parse(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    init_tracing();
    // Reserved port with nothing listening.
    let err = client_for("http://127.0.0.1:1").fetch_account().await.unwrap_err();
    assert!(matches!(err, AccountError::Request(_)));
}

// =============================================================================
// save / password reset
// =============================================================================

#[tokio::test]
async fn save_posts_the_account_body() {
    init_tracing();
    let captured = Arc::new(Captured::default());
    let app = Router::new()
        .route(
            "/api/account",
            post(|State(c): State<Arc<Captured>>, Json(body): Json<Value>| async move {
                c.saved.lock().unwrap().push(body);
                StatusCode::OK
            }),
        )
        .with_state(Arc::clone(&captured));
    let base = spawn_backend(app).await;

    let account: Identity = serde_json::from_value(json!({
        "login": "admin",
        "activated": true,
        "authorities": ["ROLE_ADMIN"],
        "langKey": "es"
    }))
    .unwrap();
    client_for(&base).save_account(&account).await.unwrap();

    let saved = captured.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0]["login"], "admin");
    assert_eq!(saved[0]["langKey"], "es");
}

#[tokio::test]
async fn password_reset_init_sends_the_bare_mail() {
    init_tracing();
    let captured = Arc::new(Captured::default());
    let app = Router::new()
        .route(
            "/api/account/reset-password/init",
            post(|State(c): State<Arc<Captured>>, Json(body): Json<Value>| async move {
                c.reset_init.lock().unwrap().push(body);
                StatusCode::OK
            }),
        )
        .with_state(Arc::clone(&captured));
    let base = spawn_backend(app).await;

    client_for(&base).request_password_reset("user@example.com").await.unwrap();
    assert_eq!(captured.reset_init.lock().unwrap().as_slice(), [json!("user@example.com")]);
}

#[tokio::test]
async fn password_reset_finish_sends_key_and_password() {
    init_tracing();
    let captured = Arc::new(Captured::default());
    let app = Router::new()
        .route(
            "/api/account/reset-password/finish",
            post(|State(c): State<Arc<Captured>>, Json(body): Json<Value>| async move {
                c.reset_finish.lock().unwrap().push(body);
                StatusCode::OK
            }),
        )
        .with_state(Arc::clone(&captured));
    let base = spawn_backend(app).await;

    client_for(&base).finish_password_reset("reset-key-123", "hunter22").await.unwrap();
    let finish = captured.reset_finish.lock().unwrap();
    assert_eq!(finish.as_slice(), [json!({ "key": "reset-key-123", "newPassword": "hunter22" })]);
}

#[tokio::test]
async fn password_reset_finish_surfaces_server_rejection() {
    init_tracing();
    let app = Router::new().route(
        "/api/account/reset-password/finish",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn_backend(app).await;

    let err = client_for(&base)
        .finish_password_reset("expired-key", "hunter22")
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Status { status: 500 }));
}

// =============================================================================
// cache over real HTTP
// =============================================================================

#[tokio::test]
async fn cache_absorbs_http_failure_as_anonymous() {
    init_tracing();
    let app = Router::new().route("/api/account", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = spawn_backend(app).await;

    let api = Arc::new(client_for(&base));
    let cache = IdentityCache::new(api, Arc::new(StateStorage::new()), None);
    let resolved = cache.identity(false).await;
    assert_eq!(resolved, None);
    assert!(!cache.is_authenticated());
}

#[tokio::test]
async fn cache_resolves_account_over_http() {
    init_tracing();
    let app = Router::new().route(
        "/api/account",
        get(|| async { Json(json!({ "login": "analyst", "authorities": ["ROLE_USER"] })) }),
    );
    let base = spawn_backend(app).await;

    let api = Arc::new(client_for(&base));
    let cache = IdentityCache::new(api, Arc::new(StateStorage::new()), None);
    let resolved = cache.identity(false).await;
    assert_eq!(resolved.unwrap().login, "analyst");
    assert!(cache.has_authority("ROLE_USER"));
}
