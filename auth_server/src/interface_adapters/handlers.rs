use crate::domain::errors::AuthError;
use crate::interface_adapters::protocol::{
    ErrorResponse, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserDataResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::login::LoginUseCase;
use crate::use_cases::refresh_token::RefreshTokenUseCase;
use crate::use_cases::verify_token::VerifyTokenUseCase;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

type ErrorReply = (StatusCode, Json<ErrorResponse>);

// Handler for exchanging credentials for an access/refresh pair.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ErrorReply> {
    let use_case = LoginUseCase {
        clock: SystemClock,
        store: state.token_store(),
        accounts: state.accounts.clone(),
        settings: state.settings,
    };

    let result = use_case
        .execute(&payload.username, &payload.password)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::Login))?;

    info!(role = %result.role, "login succeeded");
    Ok(Json(LoginResponse {
        access: result.access,
        refresh: result.refresh,
        usuario_rol: result.role,
    }))
}

// Handler for renewing an access token from a refresh token.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ErrorReply> {
    let use_case = RefreshTokenUseCase {
        clock: SystemClock,
        store: state.token_store(),
        settings: state.settings,
    };

    let result = use_case
        .execute(&payload.refresh)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::Refresh))?;

    Ok(Json(RefreshResponse {
        access: result.access,
        refresh: result.refresh,
    }))
}

// Protected resource: who the bearer of the access token is.
pub async fn user_data(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserDataResponse>, ErrorReply> {
    let token = bearer_token(&headers).ok_or_else(|| {
        detail_response(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )
    })?;

    let use_case = VerifyTokenUseCase {
        clock: SystemClock,
        store: state.token_store(),
    };

    let result = use_case
        .execute(token)
        .await
        .map_err(|err| map_auth_error(err, AuthErrorContext::Resource))?;

    Ok(Json(UserDataResponse {
        username: result.username,
        usuario_rol: result.role,
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// Helper to build a `{"detail": ...}` error response.
fn detail_response(status: StatusCode, detail: &str) -> ErrorReply {
    (
        status,
        Json(ErrorResponse::Detail {
            detail: detail.to_string(),
        }),
    )
}

fn blank_fields_response(fields: Vec<&'static str>) -> ErrorReply {
    let fields: BTreeMap<_, _> = fields
        .into_iter()
        .map(|field| (field, vec!["This field may not be blank.".to_string()]))
        .collect();
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::Fields(fields)))
}

// Maps domain errors to HTTP responses by endpoint context.
enum AuthErrorContext {
    Login,
    Refresh,
    Resource,
}

fn map_auth_error(err: AuthError, context: AuthErrorContext) -> ErrorReply {
    if let AuthError::StorageFailure = err {
        warn!("token store failure");
        return detail_response(StatusCode::BAD_GATEWAY, "storage error");
    }

    match context {
        AuthErrorContext::Login => match err {
            AuthError::BlankFields(fields) => blank_fields_response(fields),
            _ => detail_response(
                StatusCode::UNAUTHORIZED,
                "No active account found with the given credentials",
            ),
        },
        AuthErrorContext::Refresh => {
            detail_response(StatusCode::UNAUTHORIZED, "Token is invalid or expired")
        }
        AuthErrorContext::Resource => detail_response(
            StatusCode::UNAUTHORIZED,
            "Given token not valid for any token type",
        ),
    }
}
