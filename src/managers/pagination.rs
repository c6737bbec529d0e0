//! Pagination Controller: the Idle / Loading / Exhausted state machine
//! behind incremental loading.

use crate::types::pagination::{PaginationPhase, PaginationState};

#[derive(Debug, Clone)]
pub struct PaginationController {
    state: PaginationState,
    /// False until a page has been applied since the last reset.
    started: bool,
}

impl PaginationController {
    pub fn new(limit: usize) -> Self {
        Self {
            state: PaginationState::new(limit),
            started: false,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn limit(&self) -> usize {
        self.state.limit
    }

    pub fn phase(&self) -> PaginationPhase {
        if self.state.is_loading {
            PaginationPhase::Loading
        } else if !self.state.has_more {
            PaginationPhase::Exhausted
        } else {
            PaginationPhase::Idle
        }
    }

    /// Back to page 1, more available, nothing in flight.
    pub fn reset(&mut self) {
        self.state.page = 1;
        self.state.has_more = true;
        self.state.is_loading = false;
        self.started = false;
    }

    /// Page a load-more trigger should request, or `None` when the trigger
    /// must be ignored (loading or exhausted).
    pub fn next_page(&self) -> Option<u32> {
        match self.phase() {
            PaginationPhase::Idle if self.started => Some(self.state.page + 1),
            PaginationPhase::Idle => Some(1),
            PaginationPhase::Loading | PaginationPhase::Exhausted => None,
        }
    }

    /// Changes the page size. Loaded pages no longer line up, so this resets.
    pub fn set_limit(&mut self, limit: usize) {
        self.state.limit = limit.max(1);
        self.reset();
    }

    /// Enters Loading for `page`. Returns false if the request is suppressed:
    /// something is already in flight, or `page > 1` before page 1 has been
    /// applied or after exhaustion.
    pub fn try_begin(&mut self, page: u32) -> bool {
        if self.state.is_loading {
            return false;
        }
        if page > 1 && (!self.started || !self.state.has_more) {
            return false;
        }
        self.state.is_loading = true;
        true
    }

    /// Records a successful page. A short page means there is nothing more.
    pub fn finish_success(&mut self, page: u32, received: usize) {
        self.state.page = page;
        self.state.has_more = received >= self.state.limit;
        self.state.is_loading = false;
        self.started = true;
    }

    /// Leaves the cursor where it was so the next trigger retries the same page.
    pub fn finish_failure(&mut self) {
        self.state.is_loading = false;
    }
}
