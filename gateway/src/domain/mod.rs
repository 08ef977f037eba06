// Domain layer: credentials, request/response values and ports.

mod endpoints;
mod errors;
mod http;
mod ports;
mod session;

// Re-export the domain boundary types and ports.
pub use endpoints::ApiEndpoints;
pub use errors::{LoginError, RefreshError, TransportError};
pub use http::{ApiRequest, ApiResponse};
pub use ports::{HttpTransport, SessionNotifier, SessionStore};
pub use session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY, Role, Session};
