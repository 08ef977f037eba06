use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use crate::domain::{
    ApiEndpoints, ApiRequest, ApiResponse, HttpTransport, LoginError, Session, SessionNotifier,
    SessionStore, TransportError,
};
use crate::use_cases::authenticated_fetch::AuthenticatedFetch;
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::logout::{LogoutResponse, LogoutUseCase};
use crate::use_cases::session_state::SessionState;
use crate::use_cases::token_refresher::TokenRefresher;

// Wires session state, refresher and fetch around one transport and store.
// Feature code holds a `Gateway` and never touches tokens directly.
pub struct Gateway {
    endpoints: ApiEndpoints,
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionState>,
    fetch: AuthenticatedFetch,
}

impl Gateway {
    pub async fn new(
        endpoints: ApiEndpoints,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn SessionNotifier>,
    ) -> Self {
        let session = Arc::new(SessionState::init(store).await);
        let refresher = Arc::new(TokenRefresher::new(
            Arc::clone(&transport),
            Arc::clone(&session),
            endpoints.token_refresh(),
        ));
        let fetch = AuthenticatedFetch::new(
            endpoints.clone(),
            Arc::clone(&transport),
            Arc::clone(&session),
            refresher,
            notifier,
        );

        Self {
            endpoints,
            transport,
            session,
            fetch,
        }
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.get().await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        LoginUseCase {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
            login_url: self.endpoints.login(),
        }
        .execute(username, password)
        .await
    }

    pub async fn logout(&self) -> LogoutResponse {
        LogoutUseCase {
            session: Arc::clone(&self.session),
        }
        .execute()
        .await
    }

    pub async fn fetch(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.fetch.execute(request).await
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.fetch(ApiRequest::get(self.endpoints.resource(path))).await
    }

    pub async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
    ) -> Result<ApiResponse, TransportError> {
        let request = ApiRequest::json(method, self.endpoints.resource(path), payload)
            .map_err(|err| TransportError::Other(format!("request body: {err}")))?;
        self.fetch(request).await
    }
}
