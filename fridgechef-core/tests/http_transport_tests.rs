//! Tests of the real HTTP transport against a local server: bearer token
//! attachment and the retry-once refresh-and-replay on 401.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use fridgechef_core::{ApiClient, ApiError, Config, MemoryTokenStore, Session, Tokens};

struct Backend {
    /// Authorization header of every /profile request, in order.
    profile_auths: Mutex<Vec<String>>,
    refresh_calls: AtomicUsize,
    /// The only access token /profile accepts; anything else gets a 401.
    accepted_token: &'static str,
    refresh_ok: bool,
}

impl Backend {
    fn new(accepted_token: &'static str, refresh_ok: bool) -> Arc<Self> {
        Arc::new(Self {
            profile_auths: Mutex::new(Vec::new()),
            refresh_calls: AtomicUsize::new(0),
            accepted_token,
            refresh_ok,
        })
    }
}

async fn profile(
    State(backend): State<Arc<Backend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    backend.profile_auths.lock().unwrap().push(auth.clone());
    if auth == format!("Bearer {}", backend.accepted_token) {
        (
            StatusCode::OK,
            Json(json!({ "username": "chef", "email": "chef@example.com" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "access token expired" })),
        )
    }
}

async fn refresh(
    State(backend): State<Arc<Backend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    assert_eq!(body["refreshToken"], "refresh-1");
    if backend.refresh_ok {
        (StatusCode::OK, Json(json!({ "accessToken": "access-2" })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "refresh token expired" })),
        )
    }
}

async fn serve(backend: Arc<Backend>) -> SocketAddr {
    let app = Router::new()
        .route("/api/profile", get(profile))
        .route("/api/auth/refresh", post(refresh))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> (ApiClient, Arc<Session>) {
    let session = Arc::new(Session::new(Box::new(MemoryTokenStore::with_tokens(
        Tokens {
            access_token: "access-1".to_string(),
            refresh_token: "refresh-1".to_string(),
        },
    ))));
    let config = Config {
        base_url: format!("http://{addr}/api"),
        timeout: Duration::from_secs(5),
        token_file: PathBuf::from("unused"),
    };
    let client = ApiClient::connect(&config, Arc::clone(&session)).unwrap();
    (client, session)
}

#[tokio::test]
async fn test_401_refreshes_and_replays_once() {
    let backend = Backend::new("access-2", true);
    let addr = serve(Arc::clone(&backend)).await;
    let (client, session) = client_for(addr);

    let profile = client.profile().await.unwrap();
    assert_eq!(profile.email, "chef@example.com");

    // One original attempt, one replay carrying the refreshed token.
    let auths = backend.profile_auths.lock().unwrap().clone();
    assert_eq!(auths, vec!["Bearer access-1", "Bearer access-2"]);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);

    // The new access token is stored, the refresh token survives.
    assert_eq!(session.access_token().await, Some("access-2".to_string()));
    assert_eq!(session.refresh_token().await, Some("refresh-1".to_string()));
}

#[tokio::test]
async fn test_refresh_failure_clears_tokens() {
    let backend = Backend::new("access-2", false);
    let addr = serve(Arc::clone(&backend)).await;
    let (client, session) = client_for(addr);

    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
    assert!(!session.is_logged_in().await);

    // No replay after the failed refresh.
    assert_eq!(backend.profile_auths.lock().unwrap().len(), 1);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_replayed_401_is_not_retried_again() {
    // The backend never accepts any token, so the replay 401s as well.
    let backend = Backend::new("never-issued", true);
    let addr = serve(Arc::clone(&backend)).await;
    let (client, _session) = client_for(addr);

    let err = client.profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 401, .. }));

    // Exactly one replay and one refresh, never a loop.
    assert_eq!(backend.profile_auths.lock().unwrap().len(), 2);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
}
