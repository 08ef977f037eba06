use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, Role, Session, SessionStore};

// Single source of truth for the current credentials.
//
// The in-memory copy is authoritative for the running process; the store is
// written through on every change so the session survives restarts. Storage
// failures are logged and otherwise ignored: a store that cannot be read
// yields a logged-out process, a store that cannot be written only loses
// persistence.
// Result of writing back a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSwap {
    Applied,
    // Another session took over meanwhile; carries its access token.
    Superseded(String),
    LoggedOut,
}

pub struct SessionState {
    store: Arc<dyn SessionStore>,
    // Write lock is held across the store writes so the persisted triple and
    // the in-memory session never diverge under concurrent updates.
    current: RwLock<Option<Session>>,
}

impl SessionState {
    // Restore whatever a previous run persisted.
    pub async fn init(store: Arc<dyn SessionStore>) -> Self {
        let current = load_persisted(store.as_ref()).await;
        debug!(restored = current.is_some(), "session state initialised");
        Self {
            store,
            current: RwLock::new(current),
        }
    }

    pub async fn get(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.refresh_token.clone())
    }

    pub async fn set(&self, session: Session) {
        let mut current = self.current.write().await;
        self.persist(&[
            (ACCESS_TOKEN_KEY, session.access_token.as_str()),
            (REFRESH_TOKEN_KEY, session.refresh_token.as_str()),
            (ROLE_KEY, session.role.as_str()),
        ])
        .await;
        *current = Some(session);
    }

    // Returns false when there is no session to update.
    pub async fn update_access(&self, access_token: String) -> bool {
        let mut current = self.current.write().await;
        let Some(session) = current.as_mut() else {
            return false;
        };
        self.persist(&[(ACCESS_TOKEN_KEY, access_token.as_str())]).await;
        session.access_token = access_token;
        true
    }

    // Swap in tokens obtained by exchanging `sent_refresh`. Applies only while
    // the session that owned `sent_refresh` is still current: a logout or a
    // new login that landed during the exchange wins.
    pub async fn replace_tokens(
        &self,
        sent_refresh: &str,
        access_token: String,
        refresh_token: Option<String>,
    ) -> TokenSwap {
        let mut current = self.current.write().await;
        let Some(session) = current.as_mut() else {
            return TokenSwap::LoggedOut;
        };
        if session.refresh_token != sent_refresh {
            return TokenSwap::Superseded(session.access_token.clone());
        }

        match &refresh_token {
            Some(refresh_token) => {
                self.persist(&[
                    (ACCESS_TOKEN_KEY, access_token.as_str()),
                    (REFRESH_TOKEN_KEY, refresh_token.as_str()),
                ])
                .await
            }
            None => self.persist(&[(ACCESS_TOKEN_KEY, access_token.as_str())]).await,
        }

        session.access_token = access_token;
        if let Some(refresh_token) = refresh_token {
            session.refresh_token = refresh_token;
        }
        TokenSwap::Applied
    }

    // Returns whether a session was present before clearing.
    pub async fn clear(&self) -> bool {
        let mut current = self.current.write().await;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY] {
            if let Err(err) = self.store.remove(key).await {
                warn!(key, error = %err, "failed to remove persisted session key");
            }
        }
        current.take().is_some()
    }

    async fn persist(&self, entries: &[(&str, &str)]) {
        if let Err(err) = self.store.set_many(entries).await {
            let keys: Vec<&str> = entries.iter().map(|(key, _)| *key).collect();
            warn!(?keys, error = %err, "failed to persist session keys");
        }
    }
}

async fn load_persisted(store: &dyn SessionStore) -> Option<Session> {
    let access_token = read_key(store, ACCESS_TOKEN_KEY).await?;
    let refresh_token = read_key(store, REFRESH_TOKEN_KEY).await?;
    let role = read_key(store, ROLE_KEY).await?;

    Some(Session {
        access_token,
        refresh_token,
        role: Role::parse(&role),
    })
}

async fn read_key(store: &dyn SessionStore, key: &str) -> Option<String> {
    match store.get(key).await {
        Ok(Some(value)) if !value.is_empty() => Some(value),
        Ok(_) => None,
        Err(err) => {
            warn!(key, error = %err, "session storage unavailable; starting logged out");
            None
        }
    }
}
