use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tracing::{Span, debug, info, warn};

use crate::domain::{
    ApiEndpoints, ApiRequest, ApiResponse, HttpTransport, RefreshError, SessionNotifier, TransportError,
};
use crate::use_cases::session_state::SessionState;
use crate::use_cases::token_refresher::TokenRefresher;

// Which send of a logical call this is. Only `Initial` may lead to a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retry,
}

// Terminal state of one logical call, recorded on its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    Failure,
    LoggedOut,
}

impl Outcome {
    fn of(response: &ApiResponse) -> Self {
        if response.is_success() {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::LoggedOut => "logged_out",
        };
        f.write_str(label)
    }
}

// Entry point for every backend call made on behalf of the logged-in user.
//
// Attaches the bearer token, and on a 401 refreshes once and retries once.
// Requests to any other origin than the API's are sent as given, with no
// credentials and no refresh.
// Auth-layer failures end in a forced logout and are never surfaced as
// errors: callers only ever see the response they got back, or a transport
// error when no response arrived at all.
pub struct AuthenticatedFetch {
    endpoints: ApiEndpoints,
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionState>,
    refresher: Arc<TokenRefresher>,
    notifier: Arc<dyn SessionNotifier>,
}

impl AuthenticatedFetch {
    pub fn new(
        endpoints: ApiEndpoints,
        transport: Arc<dyn HttpTransport>,
        session: Arc<SessionState>,
        refresher: Arc<TokenRefresher>,
        notifier: Arc<dyn SessionNotifier>,
    ) -> Self {
        Self {
            endpoints,
            transport,
            session,
            refresher,
            notifier,
        }
    }

    #[tracing::instrument(
        name = "authenticated_fetch",
        skip_all,
        fields(method = %request.method, url = %request.url, outcome = tracing::field::Empty)
    )]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        if !self.endpoints.is_api_origin(&request.url) {
            debug!("foreign origin; sending without credentials");
            let response = self.send(&request, None, Attempt::Initial).await?;
            record(Outcome::of(&response));
            return Ok(response);
        }

        let access_token = self.session.access_token().await;
        let response = self
            .send(&request, access_token.as_deref(), Attempt::Initial)
            .await?;

        if response.status != StatusCode::UNAUTHORIZED {
            record(Outcome::of(&response));
            return Ok(response);
        }

        debug!("request unauthorized; renewing session");
        match self
            .refresher
            .refresh_replacing(access_token.as_deref())
            .await
        {
            Ok(fresh) => {
                // Whatever the retry returns is final, 401 included.
                let retried = self.send(&request, Some(&fresh), Attempt::Retry).await?;
                record(Outcome::of(&retried));
                Ok(retried)
            }
            Err(err) => {
                self.force_logout(&err).await;
                record(Outcome::LoggedOut);
                Ok(response)
            }
        }
    }

    async fn send(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
        attempt: Attempt,
    ) -> Result<ApiResponse, TransportError> {
        // Work on a copy; the caller's headers are merged, never replaced.
        let mut outbound = request.clone();
        match access_token.map(|token| HeaderValue::from_str(&format!("Bearer {token}"))) {
            Some(Ok(value)) => {
                outbound.headers.insert(AUTHORIZATION, value);
            }
            Some(Err(_)) => {
                warn!("stored access token is not a valid header value; sending without it");
            }
            None => {}
        }

        let response = self.transport.send(outbound).await.inspect_err(|err| {
            warn!(?attempt, error = %err, "request failed");
        })?;
        debug!(?attempt, status = %response.status, "response received");
        Ok(response)
    }

    async fn force_logout(&self, err: &RefreshError) {
        let had_session = self.session.clear().await;
        match err {
            RefreshError::NoSession => {
                info!("no refresh token available; session cleared");
            }
            RefreshError::RefreshFailed(reason) => {
                warn!(%reason, "session expired; forcing logout");
                // Concurrent callers share one failed refresh; notify once.
                if had_session {
                    self.notifier.session_expired();
                }
            }
        }
    }
}

fn record(outcome: Outcome) {
    Span::current().record("outcome", tracing::field::display(outcome));
}
