use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::{Account, IssuedToken, TokenSettings};
use crate::domain::ports::{AccountDirectory, Clock, TokenStore};

// Application state holding issued tokens and the account book.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<Mutex<HashMap<String, IssuedToken>>>,
    pub accounts: AccountBook,
    pub settings: TokenSettings,
}

impl AppState {
    pub fn new(accounts: Vec<Account>, settings: TokenSettings) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(HashMap::new())),
            accounts: AccountBook::new(accounts),
            settings,
        }
    }

    pub fn token_store(&self) -> InMemoryTokenStore {
        InMemoryTokenStore {
            tokens: self.tokens.clone(),
            clock: SystemClock,
        }
    }
}

// Accounts keyed by username; immutable once the server starts.
#[derive(Clone)]
pub struct AccountBook {
    accounts: Arc<HashMap<String, Account>>,
}

impl AccountBook {
    pub fn new(accounts: Vec<Account>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();
        Self {
            accounts: Arc::new(accounts),
        }
    }
}

impl AccountDirectory for AccountBook {
    fn find(&self, username: &str) -> Option<Account> {
        self.accounts.get(username).cloned()
    }
}

// In-memory token store adapter for the auth service. Expired records are
// swept on every insert, so the map stays bounded by the live tokens.
#[derive(Clone)]
pub struct InMemoryTokenStore<C = SystemClock> {
    pub tokens: Arc<Mutex<HashMap<String, IssuedToken>>>,
    pub clock: C,
}

#[async_trait]
impl<C: Clock> TokenStore for InMemoryTokenStore<C> {
    async fn insert(&self, token: String, record: IssuedToken) -> Result<(), String> {
        let now = self.clock.now_epoch_seconds();
        let mut tokens = self.tokens.lock().await;
        tokens.retain(|_, existing| !existing.is_expired(now));
        tokens.insert(token, record);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<IssuedToken>, String> {
        let tokens = self.tokens.lock().await;
        Ok(tokens.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut tokens = self.tokens.lock().await;
        Ok(tokens.remove(token).is_some())
    }
}

// System clock adapter used by auth use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
