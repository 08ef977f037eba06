use serde::Deserialize;

// Account allowed to log in, as seeded from the users file.
#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

// Opaque token record stored in memory, keyed by the token string.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub username: String,
    pub role: String,
    pub kind: TokenKind,
    pub expires_at: u64,
}

impl IssuedToken {
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at <= now
    }
}

// Lifetimes and rotation policy applied when issuing tokens.
#[derive(Clone, Copy, Debug)]
pub struct TokenSettings {
    pub access_ttl_seconds: u64,
    pub refresh_ttl_seconds: u64,
    pub rotate_refresh_tokens: bool,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            access_ttl_seconds: 5 * 60,
            refresh_ttl_seconds: 24 * 60 * 60,
            rotate_refresh_tokens: true,
        }
    }
}
