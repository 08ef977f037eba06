use std::sync::Arc;

use tracing::info;

use crate::use_cases::session_state::SessionState;

// Response returned by the logout use case.
pub struct LogoutResponse {
    pub revoked: bool,
}

// Logout is purely local: the backend keeps no server-side session to end.
pub struct LogoutUseCase {
    pub session: Arc<SessionState>,
}

impl LogoutUseCase {
    pub async fn execute(&self) -> LogoutResponse {
        let revoked = self.session.clear().await;
        info!(revoked, "logged out");
        LogoutResponse { revoked }
    }
}
