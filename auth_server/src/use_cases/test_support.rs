use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::{Account, IssuedToken, TokenKind};
use crate::domain::ports::{AccountDirectory, Clock, TokenStore};

pub const NOW: u64 = 1_700_000_000;

// Fixed time source so expiry assertions are deterministic.
pub struct FixedClock {
    pub now: u64,
}

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.now
    }
}

#[derive(Clone, Default)]
pub struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Clone, Default)]
pub struct RecordingStore {
    // Shared in-memory map lets tests inspect what execute() stored.
    pub tokens: Arc<Mutex<HashMap<String, IssuedToken>>>,
    // Toggles used by negative-path tests to simulate infrastructure failure.
    pub fail: FailureFlags,
}

impl RecordingStore {
    pub fn with_failures(fail: FailureFlags) -> Self {
        Self {
            tokens: Arc::default(),
            fail,
        }
    }

    pub fn seed(&self, token: &str, kind: TokenKind, expires_at: u64) {
        let mut guard = self.tokens.lock().expect("tokens mutex poisoned");
        guard.insert(
            token.to_string(),
            IssuedToken {
                username: "12.345.678-5".to_string(),
                role: "profesor".to_string(),
                kind,
                expires_at,
            },
        );
    }

    pub fn record(&self, token: &str) -> Option<IssuedToken> {
        let guard = self.tokens.lock().expect("tokens mutex poisoned");
        guard.get(token).cloned()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.lock().expect("tokens mutex poisoned").len()
    }
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn insert(&self, token: String, record: IssuedToken) -> Result<(), String> {
        if self.fail.insert {
            return Err("insert failed".to_string());
        }
        let mut guard = self.tokens.lock().expect("tokens mutex poisoned");
        guard.insert(token, record);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<IssuedToken>, String> {
        if self.fail.get {
            return Err("get failed".to_string());
        }
        let guard = self.tokens.lock().expect("tokens mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.fail.remove {
            return Err("remove failed".to_string());
        }
        let mut guard = self.tokens.lock().expect("tokens mutex poisoned");
        Ok(guard.remove(token).is_some())
    }
}

// Single-account directory.
pub struct StaticAccounts;

impl AccountDirectory for StaticAccounts {
    fn find(&self, username: &str) -> Option<Account> {
        (username == "12.345.678-5").then(|| Account {
            username: username.to_string(),
            password: "clave".to_string(),
            role: "profesor".to_string(),
        })
    }
}
