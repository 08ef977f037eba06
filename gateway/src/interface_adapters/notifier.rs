use crate::domain::SessionNotifier;

// Terminal notice for the CLI; stderr keeps it out of piped response bodies.
#[derive(Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl SessionNotifier for ConsoleNotifier {
    fn session_expired(&self) {
        tracing::warn!("session expired; user must log in again");
        eprintln!("Your session has expired. Please log in again.");
    }
}
