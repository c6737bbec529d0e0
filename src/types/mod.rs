// linkdeck shared type definitions
// Plain data records shared by the services, the store and the RPC surface.

pub mod bookmark;
pub mod errors;
pub mod filter;
pub mod pagination;
pub mod settings;
