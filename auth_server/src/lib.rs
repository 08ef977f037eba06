pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::entities::{Account, TokenSettings};
pub use frameworks::server::serve;
pub use interface_adapters::routes::app;
pub use interface_adapters::state::AppState;
