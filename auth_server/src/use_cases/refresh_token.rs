use tracing::info;

use crate::domain::entities::{TokenKind, TokenSettings};
use crate::domain::errors::AuthError;
use crate::domain::ports::{Clock, TokenStore};
use crate::use_cases::issue_token;

// Response returned by the refresh use case; `refresh` is set only on rotation.
pub struct RefreshResponse {
    pub access: String,
    pub refresh: Option<String>,
}

// Exchanges a refresh token for a new access token.
pub struct RefreshTokenUseCase<C, S> {
    pub clock: C,
    pub store: S,
    pub settings: TokenSettings,
}

impl<C, S> RefreshTokenUseCase<C, S>
where
    C: Clock,
    S: TokenStore,
{
    pub async fn execute(&self, refresh: &str) -> Result<RefreshResponse, AuthError> {
        let record = self
            .store
            .get(refresh)
            .await
            .map_err(|_| AuthError::StorageFailure)?
            .filter(|record| record.kind == TokenKind::Refresh)
            .ok_or(AuthError::InvalidToken)?;

        let now = self.clock.now_epoch_seconds();
        if record.is_expired(now) {
            let _ = self.store.remove(refresh).await;
            return Err(AuthError::TokenExpired);
        }

        let access = issue_token(
            &self.store,
            &record.username,
            &record.role,
            TokenKind::Access,
            now + self.settings.access_ttl_seconds,
        )
        .await?;

        if !self.settings.rotate_refresh_tokens {
            return Ok(RefreshResponse {
                access,
                refresh: None,
            });
        }

        let rotated = issue_token(
            &self.store,
            &record.username,
            &record.role,
            TokenKind::Refresh,
            now + self.settings.refresh_ttl_seconds,
        )
        .await?;
        // The presented refresh token is single-use once rotated.
        self.store
            .remove(refresh)
            .await
            .map_err(|_| AuthError::StorageFailure)?;
        info!(username = %record.username, "refresh token rotated");

        Ok(RefreshResponse {
            access,
            refresh: Some(rotated),
        })
    }
}
