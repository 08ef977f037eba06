// Interface adapters: reqwest transport, session storage, wire protocol.

pub mod clients;
pub mod notifier;
pub mod protocol;
pub mod storage;
