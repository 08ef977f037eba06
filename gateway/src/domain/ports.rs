use async_trait::async_trait;

use crate::domain::errors::TransportError;
use crate::domain::http::{ApiRequest, ApiResponse};

// Use cases depend on these traits, not on reqwest or the filesystem.
// Dependencies point inwards to the domain layer.

// Sends one request and buffers the full response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

// Durable string key-value storage that outlives the process.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, String>;
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;
    // Writes every entry in one go; durable stores persist them atomically.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), String> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
    async fn remove(&self, key: &str) -> Result<bool, String>;
}

// User-facing channel for the "session expired" notice.
pub trait SessionNotifier: Send + Sync {
    fn session_expired(&self);
}
