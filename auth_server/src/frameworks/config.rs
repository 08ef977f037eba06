use serde::Deserialize;
use std::path::Path;

use crate::domain::entities::{Account, TokenSettings};

const DEFAULT_PORT: u16 = 8000;

// Runtime settings for the development auth backend.
pub struct ServerConfig {
    pub port: u16,
    pub settings: TokenSettings,
    pub accounts: Vec<Account>,
}

#[derive(Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<Account>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = TokenSettings::default();
        let settings = TokenSettings {
            access_ttl_seconds: env_or("ACCESS_TOKEN_TTL_SECONDS", defaults.access_ttl_seconds)?,
            refresh_ttl_seconds: env_or("REFRESH_TOKEN_TTL_SECONDS", defaults.refresh_ttl_seconds)?,
            rotate_refresh_tokens: env_or("ROTATE_REFRESH_TOKENS", defaults.rotate_refresh_tokens)?,
        };

        let accounts = match std::env::var("AUTH_USERS_FILE") {
            Ok(path) => load_users(Path::new(&path))?,
            Err(_) => vec![demo_account()],
        };

        Ok(Self {
            port: env_or("AUTH_SERVER_PORT", DEFAULT_PORT)?,
            settings,
            accounts,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

pub fn load_users(path: &Path) -> Result<Vec<Account>, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("read {}: {err}", path.display()))?;
    parse_users(&raw).map_err(|err| format!("parse {}: {err}", path.display()))
}

fn parse_users(raw: &str) -> Result<Vec<Account>, toml::de::Error> {
    toml::from_str::<UsersFile>(raw).map(|file| file.users)
}

// Account available when no users file is configured.
pub fn demo_account() -> Account {
    Account {
        username: "11.111.111-1".to_string(),
        password: "fruto".to_string(),
        role: "alumno".to_string(),
    }
}
