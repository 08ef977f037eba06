use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::{ApiRequest, HttpTransport, RefreshError};
use crate::interface_adapters::protocol::{RefreshRequest, RefreshResponse};
use crate::use_cases::session_state::{SessionState, TokenSwap};

type RefreshFlight = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

// Exchanges the stored refresh token for a new access token.
//
// Refreshes are single-flight: while one is running, every other caller
// awaits the same shared future instead of issuing its own network call, so
// two concurrent 401s can never race each other to rotate the refresh token.
pub struct TokenRefresher {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionState>,
    refresh_url: String,
    in_flight: Mutex<Option<RefreshFlight>>,
}

impl TokenRefresher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionState>,
        refresh_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            refresh_url: refresh_url.into(),
            in_flight: Mutex::new(None),
        }
    }

    pub async fn refresh(&self) -> Result<String, RefreshError> {
        self.refresh_replacing(None).await
    }

    // Refresh on behalf of a request rejected while carrying `stale`. If the
    // session already moved past that token, the current one is reused.
    pub async fn refresh_replacing(&self, stale: Option<&str>) -> Result<String, RefreshError> {
        let flight = {
            let mut slot = self.in_flight.lock().await;

            // A finished flight left behind by a cancelled waiter is stale.
            if slot.as_ref().is_some_and(|flight| flight.peek().is_some()) {
                *slot = None;
            }

            match slot.as_ref() {
                Some(flight) => {
                    debug!("joining refresh already in flight");
                    flight.clone()
                }
                None => {
                    if let Some(stale) = stale {
                        if let Some(current) = self.session.access_token().await {
                            if current != stale {
                                debug!("access token already renewed; reusing it");
                                return Ok(current);
                            }
                        }
                    }
                    let flight = self.start_flight();
                    *slot = Some(flight.clone());
                    flight
                }
            }
        };

        let result = flight.clone().await;

        let mut slot = self.in_flight.lock().await;
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&flight)) {
            *slot = None;
        }
        result
    }

    fn start_flight(&self) -> RefreshFlight {
        let transport = Arc::clone(&self.transport);
        let session = Arc::clone(&self.session);
        let url = self.refresh_url.clone();

        async move { exchange_refresh_token(transport.as_ref(), &session, &url).await }
            .instrument(info_span!("token_refresh"))
            .boxed()
            .shared()
    }
}

async fn exchange_refresh_token(
    transport: &dyn HttpTransport,
    session: &SessionState,
    url: &str,
) -> Result<String, RefreshError> {
    let refresh_token = session.refresh_token().await.ok_or(RefreshError::NoSession)?;

    let request = ApiRequest::json(
        Method::POST,
        url,
        &RefreshRequest {
            refresh: &refresh_token,
        },
    )
    .map_err(|err| RefreshError::RefreshFailed(err.to_string()))?;

    let response = transport.send(request).await.map_err(|err| {
        warn!(error = %err, "refresh endpoint unreachable");
        RefreshError::RefreshFailed(err.to_string())
    })?;

    if !response.is_success() {
        warn!(status = %response.status, "refresh token rejected");
        return Err(RefreshError::RefreshFailed(format!(
            "refresh endpoint answered {}",
            response.status
        )));
    }

    let payload: RefreshResponse = response.json().map_err(|err| {
        warn!(error = %err, "refresh response could not be decoded");
        RefreshError::RefreshFailed(format!("invalid refresh response: {err}"))
    })?;

    if payload.access.is_empty() {
        return Err(RefreshError::RefreshFailed(
            "refresh response carried an empty access token".to_string(),
        ));
    }

    let rotated = payload.refresh.is_some();
    match session
        .replace_tokens(&refresh_token, payload.access.clone(), payload.refresh)
        .await
    {
        TokenSwap::Applied => {
            info!(rotated, "access token refreshed");
            Ok(payload.access)
        }
        TokenSwap::Superseded(current) => {
            debug!("session replaced while refreshing; keeping the new one");
            Ok(current)
        }
        // Logged out while the refresh was running; do not resurrect it.
        TokenSwap::LoggedOut => Err(RefreshError::NoSession),
    }
}
