// Frameworks layer: process configuration and the HTTP server.

pub mod config;
pub mod server;
