// Shared fixtures for gateway integration tests: a scripted fake backend and
// the real development auth server, both bound to ephemeral ports.
#![allow(dead_code)]

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{get, post};
use axum::{Json, Router};
use gateway::domain::SessionNotifier;
use gateway::interface_adapters::clients::ReqwestTransport;
use gateway::interface_adapters::storage::InMemorySessionStore;
use gateway::{ApiEndpoints, Gateway};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

// Knobs and counters of the fake backend.
pub struct BackendState {
    pub refresh_calls: AtomicUsize,
    pub resource_calls: AtomicUsize,
    pub fail_refresh: AtomicBool,
    // Only this access token is accepted on the protected resource.
    pub valid_access: Mutex<String>,
    pub refresh_delay: Duration,
}

impl BackendState {
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn resource_calls(&self) -> usize {
        self.resource_calls.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

// Login hands out A1/R1, refresh hands out A2 and the resource accepts only
// `valid_access` (A2 unless a test changes it), so the first protected call
// after login always needs a refresh.
pub async fn spawn_fake_backend() -> FakeBackend {
    let state = Arc::new(BackendState {
        refresh_calls: AtomicUsize::new(0),
        resource_calls: AtomicUsize::new(0),
        fail_refresh: AtomicBool::new(false),
        valid_access: Mutex::new("A2".to_string()),
        refresh_delay: Duration::from_millis(50),
    });

    let router = Router::new()
        .route("/api/auth/login/", post(fake_login))
        .route("/api/auth/token/refresh/", post(fake_refresh))
        .route("/api/home-data/", get(fake_resource))
        .with_state(Arc::clone(&state));

    let base_url = serve_on_ephemeral_port(move |listener| async move {
        let _ = axum::serve(listener, router).await;
    })
    .await;

    FakeBackend { base_url, state }
}

// Real development backend with the given token policy.
pub async fn spawn_auth_server(settings: auth_server::TokenSettings) -> String {
    let accounts = vec![auth_server::Account {
        username: "12.345.678-5".to_string(),
        password: "clave".to_string(),
        role: "alumno".to_string(),
    }];
    let state = auth_server::AppState::new(accounts, settings);

    serve_on_ephemeral_port(move |listener| async move {
        let _ = auth_server::serve(listener, state).await;
    })
    .await
}

async fn serve_on_ephemeral_port<F, Fut>(serve: F) -> String
where
    F: FnOnce(TcpListener) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(serve(listener));
    format!("http://{addr}/api")
}

async fn fake_login() -> Json<Value> {
    Json(json!({ "access": "A1", "refresh": "R1", "usuario_rol": "alumno" }))
}

async fn fake_refresh(
    State(state): State<Arc<BackendState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    // Keep the refresh in flight long enough for concurrent callers to pile up.
    tokio::time::sleep(state.refresh_delay).await;

    if state.fail_refresh.load(Ordering::SeqCst) || payload["refresh"] != "R1" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired" })),
        );
    }
    (StatusCode::OK, Json(json!({ "access": "A2" })))
}

async fn fake_resource(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.resource_calls.fetch_add(1, Ordering::SeqCst);
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    let valid = state.valid_access.lock().expect("valid access mutex").clone();

    match presented {
        Some(token) if token == valid => (StatusCode::OK, Json(json!({ "frutos": 3 }))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Given token not valid for any token type" })),
        ),
    }
}

#[derive(Default)]
pub struct CountingNotifier {
    pub expired: AtomicUsize,
}

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionNotifier for CountingNotifier {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

pub async fn gateway_for(
    base_url: &str,
    store: InMemorySessionStore,
    notifier: Arc<CountingNotifier>,
) -> Gateway {
    let transport =
        ReqwestTransport::new(Duration::from_secs(5)).expect("expected http client to build");
    Gateway::new(
        ApiEndpoints::new(base_url).expect("valid base url"),
        Arc::new(transport),
        Arc::new(store),
        notifier,
    )
    .await
}
