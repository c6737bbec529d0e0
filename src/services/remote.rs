//! The Remote Bookmark Service contract consumed by the collection store.
//!
//! Implementations: [`HttpBookmarkService`](super::http_service::HttpBookmarkService)
//! for a bookmark API, [`LocalBookmarkService`](super::local_service::LocalBookmarkService)
//! for an on-disk simulation.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::filter::FilterState;

/// One page request: 1-based page number, page size and filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: usize,
    pub filter: FilterState,
}

impl ListQuery {
    /// Index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.limit
    }
}

/// One page of results as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage {
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub has_more: bool,
}

/// Create/read/update/delete over a bookmark collection addressed by string ids.
///
/// Every call may fail or take arbitrarily long; failures use the
/// [`StoreError`] taxonomy.
pub trait BookmarkService {
    /// Returns one filtered page.
    fn list(&self, query: &ListQuery) -> impl Future<Output = Result<ListPage, StoreError>>;

    /// Stores a new record and returns it with its service-assigned id.
    fn create(&self, record: &NewBookmark) -> impl Future<Output = Result<Bookmark, StoreError>>;

    /// Replaces the stored record and returns what the service kept.
    fn update(&self, id: &str, record: &Bookmark) -> impl Future<Output = Result<Bookmark, StoreError>>;

    /// Deletes a record. Succeeds when the id is already absent.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), StoreError>>;
}
