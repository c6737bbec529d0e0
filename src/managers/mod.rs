// linkdeck state managers
// Managers own mutable state: the bookmark collection and its pagination cursor.

pub mod collection_store;
pub mod pagination;
