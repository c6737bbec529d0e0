// linkdeck services
// Filtering, favicon derivation, the bookmark service contract and its
// implementations, and settings persistence.

pub mod favicon;
pub mod filter_engine;
pub mod http_service;
pub mod local_service;
pub mod remote;
pub mod settings_engine;
