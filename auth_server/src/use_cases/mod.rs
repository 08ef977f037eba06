// Use cases layer: credential login, token refresh and token verification.

pub mod login;
pub mod refresh_token;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;

use uuid::Uuid;

use crate::domain::entities::{IssuedToken, TokenKind};
use crate::domain::errors::AuthError;
use crate::domain::ports::TokenStore;

// Mints an opaque token for `username` and stores its record.
pub(crate) async fn issue_token<S: TokenStore>(
    store: &S,
    username: &str,
    role: &str,
    kind: TokenKind,
    expires_at: u64,
) -> Result<String, AuthError> {
    let token = Uuid::new_v4().to_string();
    let record = IssuedToken {
        username: username.to_string(),
        role: role.to_string(),
        kind,
        expires_at,
    };

    store
        .insert(token.clone(), record)
        .await
        .map_err(|_| AuthError::StorageFailure)?;

    Ok(token)
}
