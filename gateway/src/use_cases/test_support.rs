use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use crate::domain::{
    ACCESS_TOKEN_KEY, ApiRequest, ApiResponse, HttpTransport, REFRESH_TOKEN_KEY, ROLE_KEY, Role,
    Session, SessionNotifier, SessionStore, TransportError,
};
use crate::use_cases::session_state::SessionState;

pub(crate) const API_BASE: &str = "http://api.test/";
pub(crate) const LOGIN_URL: &str = "http://api.test/auth/login/";
pub(crate) const REFRESH_URL: &str = "http://api.test/auth/token/refresh/";
pub(crate) const RESOURCE_URL: &str = "http://api.test/home-data/";

pub(crate) fn session(access: &str, refresh: &str, role: Role) -> Session {
    Session {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        role,
    }
}

pub(crate) async fn state_with(store: RecordingStore) -> Arc<SessionState> {
    Arc::new(SessionState::init(Arc::new(store)).await)
}

pub(crate) fn json_response(status: StatusCode, payload: Value) -> ApiResponse {
    let mut response = ApiResponse::new(status, payload.to_string());
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub(crate) fn json_body(request: &ApiRequest) -> Value {
    let body = request.body.as_deref().expect("expected request body");
    serde_json::from_slice(body).expect("expected json request body")
}

// Bearer token carried by a request, if any.
pub(crate) fn bearer(request: &ApiRequest) -> Option<String> {
    request
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub remove: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    failures: FailureFlags,
    set_many_calls: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
            set_many_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn seed(&self, key: &str, value: &str) {
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
    }

    pub(crate) fn seed_session(&self, session: &Session) {
        self.seed(ACCESS_TOKEN_KEY, &session.access_token);
        self.seed(REFRESH_TOKEN_KEY, &session.refresh_token);
        self.seed(ROLE_KEY, session.role.as_str());
    }

    pub(crate) fn set_many_calls(&self) -> usize {
        self.set_many_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }
        self.seed(key, value);
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }
        self.set_many_calls.fetch_add(1, Ordering::SeqCst);
        for (key, value) in entries {
            self.seed(key, value);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard.remove(key).is_some())
    }
}

type Responder = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

// Transport answering from a closure and recording every request it saw.
pub(crate) struct ScriptedTransport {
    responder: Responder,
    requests: Mutex<Vec<ApiRequest>>,
    // Applied before answering so concurrent callers overlap.
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        responder: impl Fn(&ApiRequest) -> Result<ApiResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().expect("requests mutex poisoned").len()
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .iter()
            .filter(|request| request.url == url)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(&request)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    expired: AtomicUsize,
}

impl RecordingNotifier {
    pub(crate) fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

impl SessionNotifier for RecordingNotifier {
    fn session_expired(&self) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}
