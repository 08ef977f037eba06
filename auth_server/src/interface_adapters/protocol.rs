use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Request payload for credential login. Missing fields count as blank.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Response payload for credential login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub usuario_rol: String,
}

// Request payload for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// Response payload for token refresh; `refresh` only appears on rotation.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

// Response payload for the protected user-data resource.
#[derive(Debug, Serialize)]
pub struct UserDataResponse {
    pub username: String,
    pub usuario_rol: String,
}

// Error envelope: either `{"detail": ...}` or per-field message lists.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorResponse {
    Detail { detail: String },
    Fields(BTreeMap<&'static str, Vec<String>>),
}
