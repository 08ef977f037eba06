pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{ApiEndpoints, ApiRequest, ApiResponse, Role, Session};
pub use use_cases::Gateway;
