use crate::domain::entities::{IssuedToken, TokenKind};
use crate::domain::errors::AuthError;
use crate::domain::ports::{Clock, TokenStore};

// Identity behind a live access token.
pub struct VerifyTokenResponse {
    pub username: String,
    pub role: String,
}

// Access token verification use case with injected dependencies.
pub struct VerifyTokenUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> VerifyTokenUseCase<C, S>
where
    C: Clock,
    S: TokenStore,
{
    pub async fn execute(&self, token: &str) -> Result<VerifyTokenResponse, AuthError> {
        let record = self
            .store
            .get(token)
            .await
            .map_err(|_| AuthError::StorageFailure)?
            .filter(|record| record.kind == TokenKind::Access)
            .ok_or(AuthError::InvalidToken)?;

        if record.is_expired(self.clock.now_epoch_seconds()) {
            // Best-effort cleanup of expired token.
            let _ = self.store.remove(token).await;
            return Err(AuthError::TokenExpired);
        }

        Ok(map_record(record))
    }
}

fn map_record(record: IssuedToken) -> VerifyTokenResponse {
    VerifyTokenResponse {
        username: record.username,
        role: record.role,
    }
}
