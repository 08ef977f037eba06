use std::sync::Arc;

use reqwest::Method;
use tracing::{info, warn};

use crate::domain::{ApiRequest, HttpTransport, LoginError, Role, Session};
use crate::interface_adapters::protocol::{LoginRequest, LoginResponse, error_message};
use crate::use_cases::session_state::SessionState;

// Login use case with injected dependencies.
pub struct LoginUseCase {
    pub transport: Arc<dyn HttpTransport>,
    pub session: Arc<SessionState>,
    pub login_url: String,
}

impl LoginUseCase {
    #[tracing::instrument(name = "login", skip_all)]
    pub async fn execute(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let username = normalize_rut(username);
        let request = ApiRequest::json(
            Method::POST,
            self.login_url.as_str(),
            &LoginRequest {
                username: &username,
                password,
            },
        )
        .map_err(|err| LoginError::InvalidResponse(err.to_string()))?;

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            let message = error_message(&response.body);
            warn!(status = %response.status, "login rejected");
            return Err(LoginError::Rejected {
                status: response.status,
                message,
            });
        }

        let payload: LoginResponse = response
            .json()
            .map_err(|err| LoginError::InvalidResponse(err.to_string()))?;

        let session = Session {
            access_token: payload.access,
            refresh_token: payload.refresh,
            role: Role::parse(&payload.usuario_rol),
        };
        self.session.set(session.clone()).await;

        info!(role = %session.role, "logged in");
        Ok(session)
    }
}

// Usernames are Chilean RUTs; accept them typed any which way and send the
// canonical `12.345.678-K` form. Anything that is not RUT-shaped is sent as is.
pub fn normalize_rut(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'k' | 'K'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return input.to_string();
    }

    let (body, check_digit) = cleaned.split_at(cleaned.len() - 1);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return input.to_string();
    }

    let grouped = match body.len() {
        8 => format!("{}.{}.{}", &body[..2], &body[2..5], &body[5..]),
        7 => format!("{}.{}.{}", &body[..1], &body[1..4], &body[4..]),
        _ => return input.to_string(),
    };

    format!("{grouped}-{check_digit}")
}
