use crate::interface_adapters::handlers::{login, refresh_token, user_data};
use crate::interface_adapters::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Every route lives under `/api`, matching the client's default base URL.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/auth/login/", post(login))
        .route("/auth/token/refresh/", post(refresh_token))
        .route("/user-data/", get(user_data));

    Router::new().nest("/api", api).with_state(state)
}
