// Use cases layer: session lifecycle and authenticated request workflows.

pub mod authenticated_fetch;
pub mod gateway;
pub mod login;
pub mod logout;
pub mod session_state;
pub mod token_refresher;

#[cfg(test)]
pub(crate) mod test_support;

pub use authenticated_fetch::AuthenticatedFetch;
pub use gateway::Gateway;
pub use session_state::SessionState;
pub use token_refresher::TokenRefresher;
