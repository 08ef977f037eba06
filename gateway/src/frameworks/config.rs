use std::{env, path::PathBuf, time::Duration};

// Runtime settings, read from the environment (and `.env` when present).

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

pub fn api_url() -> String {
    env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

// Where the session survives between runs. Defaults to ~/.fruto/session.json.
pub fn session_file() -> PathBuf {
    if let Ok(path) = env::var("SESSION_FILE") {
        return PathBuf::from(path);
    }
    let home = directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".fruto").join("session.json")
}

pub fn request_timeout() -> Duration {
    millis_or(env::var("REQUEST_TIMEOUT_MS").ok(), DEFAULT_REQUEST_TIMEOUT_MS)
}

fn millis_or(value: Option<String>, default: u64) -> Duration {
    let millis = value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}
