use serde::{Deserialize, Serialize};

/// Default number of bookmarks requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Cursor and flags for incremental loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    /// Last page applied to the collection (1-based).
    pub page: u32,
    pub limit: usize,
    pub has_more: bool,
    pub is_loading: bool,
}

impl PaginationState {
    pub fn new(limit: usize) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            has_more: true,
            is_loading: false,
        }
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Where the pagination state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationPhase {
    Idle,
    Loading,
    Exhausted,
}
