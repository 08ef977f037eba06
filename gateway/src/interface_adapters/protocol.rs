use serde::{Deserialize, Serialize};
use serde_json::Value;

// Wire shapes of the backend's auth endpoints.

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub usuario_rol: String,
}

#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    // Present only when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}

// Pulls the most useful human-readable message out of an error body.
// Field order mirrors what the login form used to surface first.
pub fn error_message(body: &[u8]) -> String {
    let Ok(payload) = serde_json::from_slice::<Value>(body) else {
        return String::from_utf8_lossy(body).trim().to_string();
    };

    if let Some(detail) = payload.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }
    if let Some(messages) = joined(&payload, "username") {
        return format!("username: {messages}");
    }
    if let Some(messages) = joined(&payload, "password") {
        return format!("password: {messages}");
    }
    if let Some(messages) = joined(&payload, "non_field_errors") {
        return messages;
    }
    payload.to_string()
}

fn joined(payload: &Value, field: &str) -> Option<String> {
    let messages = payload.get(field)?.as_array()?;
    let parts: Vec<&str> = messages.iter().filter_map(Value::as_str).collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", "))
}
