// Interface adapters: HTTP handlers, routes, wire payloads and in-memory state.

pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
