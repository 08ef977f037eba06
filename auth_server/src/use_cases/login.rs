use crate::domain::entities::{TokenKind, TokenSettings};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AccountDirectory, Clock, TokenStore};
use crate::use_cases::issue_token;

// Response returned by the login use case.
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub role: String,
}

// Credential login use case with injected dependencies.
pub struct LoginUseCase<C, S, D> {
    pub clock: C,
    pub store: S,
    pub accounts: D,
    pub settings: TokenSettings,
}

impl<C, S, D> LoginUseCase<C, S, D>
where
    C: Clock,
    S: TokenStore,
    D: AccountDirectory,
{
    pub async fn execute(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let mut blank = Vec::new();
        if username.trim().is_empty() {
            blank.push("username");
        }
        if password.is_empty() {
            blank.push("password");
        }
        if !blank.is_empty() {
            return Err(AuthError::BlankFields(blank));
        }

        let account = self
            .accounts
            .find(username.trim())
            .filter(|account| account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let now = self.clock.now_epoch_seconds();
        let access = issue_token(
            &self.store,
            &account.username,
            &account.role,
            TokenKind::Access,
            now + self.settings.access_ttl_seconds,
        )
        .await?;
        let refresh = issue_token(
            &self.store,
            &account.username,
            &account.role,
            TokenKind::Refresh,
            now + self.settings.refresh_ttl_seconds,
        )
        .await?;

        Ok(LoginResponse {
            access,
            refresh,
            role: account.role,
        })
    }
}
