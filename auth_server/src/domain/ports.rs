use async_trait::async_trait;

use crate::domain::entities::{Account, IssuedToken};

// Port for token storage used by auth use cases.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert(&self, token: String, record: IssuedToken) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<IssuedToken>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
}

// Port for looking up accounts by username.
pub trait AccountDirectory: Send + Sync {
    fn find(&self, username: &str) -> Option<Account>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
