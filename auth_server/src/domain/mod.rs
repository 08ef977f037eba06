// Domain layer: accounts, issued tokens and the ports use cases depend on.

pub mod entities;
pub mod errors;
pub mod ports;
