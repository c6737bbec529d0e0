//! Collection Store for linkdeck.
//!
//! Owns the loaded bookmarks, the authoritative category and tag lists, the
//! filter selection and the pagination cursor. All mutation goes through the
//! methods here; service failures come back as [`StoreError`] with local
//! state untouched.
//!
//! Page fetches are split into [`CollectionStore::begin_fetch`] and
//! [`CollectionStore::complete_fetch`] so a response can arrive after the
//! filter has moved on. Each request carries the generation it was issued
//! under; responses from an older generation are dropped on arrival.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::favicon::{favicon_for, parse_http_url};
use crate::services::filter_engine;
use crate::services::remote::{BookmarkService, ListPage, ListQuery};
use crate::types::bookmark::{
    now_millis, Bookmark, BookmarkDraft, BookmarkPatch, Category, CategoryPatch, NewBookmark, Note,
    Tag, TagPatch, UNCATEGORIZED_ID,
};
use crate::types::errors::StoreError;
use crate::types::filter::FilterState;
use crate::types::pagination::{PaginationPhase, PaginationState};

use super::pagination::PaginationController;

/// An issued page request. Hand it back to [`CollectionStore::complete_fetch`]
/// together with the service's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub query: ListQuery,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a fetch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged into the collection.
    Applied { page: u32, received: usize, has_more: bool },
    /// A fetch was already in flight or there are no more pages.
    Suppressed,
    /// The filter changed while the request was in flight; the result was discarded.
    Stale,
}

/// Serializable view of the store for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub bookmarks: Vec<Bookmark>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub filter: FilterState,
    pub pagination: PaginationState,
    pub phase: PaginationPhase,
}

/// A change to the category/tag lists that must reach every bookmark.
enum Cascade<'a> {
    CategoryChanged(&'a Category),
    CategoryRemoved(&'a str),
    TagChanged(&'a Tag),
    TagRemoved(&'a str),
}

pub struct CollectionStore<S> {
    service: S,
    bookmarks: Vec<Bookmark>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    filter: FilterState,
    pagination: PaginationController,
    generation: u64,
}

impl<S: BookmarkService> CollectionStore<S> {
    /// A store seeded with the default categories and tags.
    pub fn new(service: S, page_size: usize) -> Self {
        Self::with_taxonomy(service, page_size, Category::defaults(), Tag::defaults())
    }

    pub fn with_taxonomy(service: S, page_size: usize, categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        Self {
            service,
            bookmarks: Vec::new(),
            categories,
            tags,
            filter: FilterState::default(),
            pagination: PaginationController::new(page_size),
            generation: 0,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Every loaded bookmark, hidden ones included, in load order.
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &PaginationState {
        self.pagination.state()
    }

    pub fn phase(&self) -> PaginationPhase {
        self.pagination.phase()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loaded bookmarks that are not hidden and match the current filter.
    pub fn visible_bookmarks(&self) -> Vec<&Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| !b.hidden && filter_engine::matches(b, &self.filter))
            .collect()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            bookmarks: self.visible_bookmarks().into_iter().cloned().collect(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            filter: self.filter.clone(),
            pagination: self.pagination.state().clone(),
            phase: self.pagination.phase(),
        }
    }

    // --- Filter transitions ---
    //
    // Each resets pagination and supersedes any in-flight request. Callers
    // follow up with `refresh()` (or `begin_fetch(1)`) to load from the start.

    /// Starts a new generation: in-flight results become stale.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.pagination.reset();
        debug!(generation = self.generation, "Filter changed, pagination reset");
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
        self.invalidate();
    }

    pub fn set_selected_category(&mut self, category_id: Option<String>) {
        self.filter.selected_category = category_id;
        self.invalidate();
    }

    pub fn toggle_tag(&mut self, tag_id: &str) {
        self.filter.toggle_tag(tag_id);
        self.invalidate();
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.invalidate();
    }

    /// Applies a new page size. Returns false when it is unchanged; otherwise
    /// pagination restarts and the caller should refresh.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size.max(1) == self.pagination.limit() {
            return false;
        }
        self.generation += 1;
        self.pagination.set_limit(page_size);
        info!(page_size = self.pagination.limit(), "Page size changed");
        true
    }

    // --- Fetching ---

    /// Issues a request for `page` under the current filter, entering Loading.
    ///
    /// Returns `None` when suppressed: a fetch is already in flight for this
    /// configuration, or `page > 1` before page 1 has been applied or once the
    /// collection is exhausted.
    pub fn begin_fetch(&mut self, page: u32) -> Option<FetchTicket> {
        let page = page.max(1);
        if !self.pagination.try_begin(page) {
            debug!(page, phase = ?self.pagination.phase(), "Fetch suppressed");
            return None;
        }
        if page == 1 {
            // Restarting from the top is a reset of its own.
            self.generation += 1;
        }
        debug!(page, generation = self.generation, "Requesting bookmark page");
        Some(FetchTicket {
            generation: self.generation,
            query: ListQuery {
                page,
                limit: self.pagination.limit(),
                filter: self.filter.clone(),
            },
        })
    }

    /// Applies the answer to a ticket from [`begin_fetch`](Self::begin_fetch).
    ///
    /// Page 1 replaces the collection, later pages append without repeating
    /// ids. Answers for a superseded generation are discarded whether they
    /// succeeded or not.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ListPage, StoreError>,
    ) -> Result<FetchOutcome, StoreError> {
        if ticket.generation != self.generation {
            debug!(
                page = ticket.page(),
                issued = ticket.generation,
                current = self.generation,
                "Dropping stale bookmark page"
            );
            return Ok(FetchOutcome::Stale);
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.pagination.finish_failure();
                warn!(page = ticket.page(), error = %e, "Bookmark page request failed");
                return Err(e);
            }
        };

        let received = page.bookmarks.len();
        let mut incoming = page.bookmarks;
        for bookmark in &mut incoming {
            self.normalize(bookmark);
        }

        if ticket.page() == 1 {
            self.bookmarks.clear();
        }
        for bookmark in incoming {
            if !self.bookmarks.iter().any(|b| b.id == bookmark.id) {
                self.bookmarks.push(bookmark);
            }
        }

        self.pagination.finish_success(ticket.page(), received);
        let has_more = self.pagination.state().has_more;
        if has_more != page.has_more {
            debug!(page = ticket.page(), received, server_has_more = page.has_more, "Service hasMore disagrees with page size");
        }
        info!(page = ticket.page(), received, total = self.bookmarks.len(), has_more, "Applied bookmark page");

        Ok(FetchOutcome::Applied {
            page: ticket.page(),
            received,
            has_more,
        })
    }

    /// Requests and applies one page.
    pub async fn fetch_page(&mut self, page: u32) -> Result<FetchOutcome, StoreError> {
        let Some(ticket) = self.begin_fetch(page) else {
            return Ok(FetchOutcome::Suppressed);
        };
        let result = self.service.list(&ticket.query).await;
        self.complete_fetch(ticket, result)
    }

    /// Reloads from page 1 under the current filter.
    pub async fn refresh(&mut self) -> Result<FetchOutcome, StoreError> {
        self.fetch_page(1).await
    }

    /// Fetches the page after the last applied one; a no-op while loading or
    /// once exhausted.
    pub async fn load_more(&mut self) -> Result<FetchOutcome, StoreError> {
        match self.pagination.next_page() {
            Some(page) => self.fetch_page(page).await,
            None => {
                debug!(phase = ?self.pagination.phase(), "Load-more ignored");
                Ok(FetchOutcome::Suppressed)
            }
        }
    }

    // --- Bookmark mutations ---

    fn resolve_category(&self, id: Option<&str>) -> Result<Option<Category>, StoreError> {
        match id {
            None => Ok(None),
            Some(UNCATEGORIZED_ID) => Ok(Some(Category::uncategorized())),
            Some(id) => self
                .categories
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .map(Some)
                .ok_or_else(|| StoreError::ValidationFailure(format!("unknown category: {}", id))),
        }
    }

    fn resolve_tags(&self, ids: &[String]) -> Result<Vec<Tag>, StoreError> {
        let mut resolved: Vec<Tag> = Vec::with_capacity(ids.len());
        for id in ids {
            if resolved.iter().any(|t| &t.id == id) {
                continue;
            }
            let tag = self
                .tags
                .iter()
                .find(|t| &t.id == id)
                .ok_or_else(|| StoreError::ValidationFailure(format!("unknown tag: {}", id)))?;
            resolved.push(tag.clone());
        }
        Ok(resolved)
    }

    fn require_title(title: &str) -> Result<String, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::ValidationFailure("title is required".to_string()));
        }
        Ok(title.to_string())
    }

    /// Validates the draft, stamps it and appends the service's record.
    pub async fn create_bookmark(&mut self, draft: BookmarkDraft) -> Result<Bookmark, StoreError> {
        let title = Self::require_title(&draft.title)?;
        let url = draft.url.trim().to_string();
        parse_http_url(&url)?;
        let category = self.resolve_category(draft.category_id.as_deref())?;
        let tags = self.resolve_tags(&draft.tag_ids)?;
        let now = now_millis();

        let record = NewBookmark {
            title,
            favicon: favicon_for(&url),
            url,
            description: draft.description,
            category,
            tags,
            notes: draft.notes,
            custom_style: draft.custom_style,
            hidden: false,
            created_at: now,
            updated_at: now,
        };

        let mut created = self.service.create(&record).await.map_err(|e| {
            warn!(error = %e, "Create bookmark failed");
            e
        })?;
        self.normalize(&mut created);

        match self.bookmarks.iter_mut().find(|b| b.id == created.id) {
            Some(existing) => *existing = created.clone(),
            None => self.bookmarks.push(created.clone()),
        }
        info!(id = %created.id, "Created bookmark");
        Ok(created)
    }

    /// Merges `patch` over the local record and sends the result.
    ///
    /// The favicon is recomputed only when the url changes. On success the
    /// service's record replaces the local one; on failure nothing changes.
    pub async fn update_bookmark(&mut self, id: &str, patch: BookmarkPatch) -> Result<Bookmark, StoreError> {
        let current = self
            .bookmark(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut merged = current.clone();

        if let Some(title) = &patch.title {
            merged.title = Self::require_title(title)?;
        }
        if let Some(url) = &patch.url {
            let url = url.trim();
            if url != current.url {
                parse_http_url(url)?;
                let url = url.to_string();
                merged.favicon = favicon_for(&url);
                merged.url = url;
            }
        }
        if let Some(description) = patch.description {
            merged.description = description;
        }
        if let Some(category_id) = &patch.category_id {
            merged.category = self.resolve_category(Some(category_id))?;
        }
        if let Some(tag_ids) = &patch.tag_ids {
            merged.tags = self.resolve_tags(tag_ids)?;
        }
        if let Some(notes) = patch.notes {
            merged.notes = notes;
        }
        if let Some(style) = patch.custom_style {
            merged.custom_style = style;
        }
        if let Some(hidden) = patch.hidden {
            merged.hidden = hidden;
        }
        merged.updated_at = now_millis().max(current.updated_at);

        let mut confirmed = self.service.update(id, &merged).await.map_err(|e| {
            warn!(%id, error = %e, "Update bookmark failed");
            e
        })?;
        confirmed.id = current.id.clone();
        self.normalize(&mut confirmed);

        if let Some(slot) = self.bookmarks.iter_mut().find(|b| b.id == id) {
            *slot = confirmed.clone();
        }
        debug!(%id, "Updated bookmark");
        Ok(confirmed)
    }

    pub async fn hide_bookmark(&mut self, id: &str) -> Result<Bookmark, StoreError> {
        let patch = BookmarkPatch {
            hidden: Some(true),
            ..BookmarkPatch::default()
        };
        self.update_bookmark(id, patch).await
    }

    /// Appends a note to a bookmark.
    pub async fn add_note(&mut self, bookmark_id: &str, title: &str, content: &str) -> Result<Note, StoreError> {
        let bookmark = self
            .bookmark(bookmark_id)
            .ok_or_else(|| StoreError::NotFound(bookmark_id.to_string()))?;
        let now = now_millis();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };
        let mut notes = bookmark.notes.clone();
        notes.push(note.clone());

        let patch = BookmarkPatch {
            notes: Some(notes),
            ..BookmarkPatch::default()
        };
        self.update_bookmark(bookmark_id, patch).await?;
        Ok(note)
    }

    /// Drops a note from a bookmark. A missing note is a no-op.
    pub async fn remove_note(&mut self, bookmark_id: &str, note_id: &str) -> Result<(), StoreError> {
        let bookmark = self
            .bookmark(bookmark_id)
            .ok_or_else(|| StoreError::NotFound(bookmark_id.to_string()))?;
        if !bookmark.notes.iter().any(|n| n.id == note_id) {
            return Ok(());
        }
        let notes = bookmark.notes.iter().filter(|n| n.id != note_id).cloned().collect();

        let patch = BookmarkPatch {
            notes: Some(notes),
            ..BookmarkPatch::default()
        };
        self.update_bookmark(bookmark_id, patch).await?;
        Ok(())
    }

    /// Deletes a bookmark. Removing an id that is not loaded is a no-op.
    pub async fn remove_bookmark(&mut self, id: &str) -> Result<(), StoreError> {
        if self.bookmark(id).is_none() {
            debug!(%id, "Remove ignored, bookmark not loaded");
            return Ok(());
        }
        match self.service.delete(id).await {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                warn!(%id, error = %e, "Remove bookmark failed");
                return Err(e);
            }
        }
        self.bookmarks.retain(|b| b.id != id);
        info!(%id, "Removed bookmark");
        Ok(())
    }

    // --- Categories and tags ---

    fn require_name(name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::ValidationFailure("name is required".to_string()));
        }
        Ok(name.to_string())
    }

    /// Rewrites the embedded category/tags of one bookmark from the
    /// authoritative lists. Ids the lists do not know yet (a category created
    /// in an earlier session, say) are adopted into them as they are.
    fn normalize(&mut self, bookmark: &mut Bookmark) {
        if let Some(category) = &mut bookmark.category {
            if category.id != UNCATEGORIZED_ID {
                match self.categories.iter().find(|c| c.id == category.id) {
                    Some(current) => *category = current.clone(),
                    None => {
                        debug!(id = %category.id, name = %category.name, "Adopting category from fetched record");
                        self.categories.push(category.clone());
                    }
                }
            }
        }
        for tag in &mut bookmark.tags {
            match self.tags.iter().find(|t| t.id == tag.id) {
                Some(current) => *tag = current.clone(),
                None => {
                    debug!(id = %tag.id, name = %tag.name, "Adopting tag from fetched record");
                    self.tags.push(tag.clone());
                }
            }
        }
    }

    /// Applies one taxonomy change to a single record. Returns whether it changed.
    fn apply_cascade(bookmark: &mut Bookmark, change: &Cascade<'_>) -> bool {
        match change {
            Cascade::CategoryChanged(category) => match &mut bookmark.category {
                Some(embedded) if embedded.id == category.id && embedded != *category => {
                    *embedded = (*category).clone();
                    true
                }
                _ => false,
            },
            Cascade::CategoryRemoved(id) => {
                if bookmark.category.as_ref().is_some_and(|c| c.id == *id) {
                    bookmark.category = Some(Category::uncategorized());
                    true
                } else {
                    false
                }
            }
            Cascade::TagChanged(tag) => match bookmark.tags.iter_mut().find(|t| t.id == tag.id) {
                Some(embedded) if embedded != *tag => {
                    *embedded = (*tag).clone();
                    true
                }
                _ => false,
            },
            Cascade::TagRemoved(id) => {
                let before = bookmark.tags.len();
                bookmark.tags.retain(|t| t.id != *id);
                bookmark.tags.len() != before
            }
        }
    }

    /// Every stored record matching `filter`, across all pages.
    async fn collect_matching(&self, filter: FilterState) -> Result<Vec<Bookmark>, StoreError> {
        let limit = self.pagination.limit();
        let mut found = Vec::new();
        let mut page = 1;
        loop {
            let query = ListQuery {
                page,
                limit,
                filter: filter.clone(),
            };
            let batch = self.service.list(&query).await?;
            let received = batch.bookmarks.len();
            let before = found.len();
            for bookmark in batch.bookmarks {
                if !found.iter().any(|b: &Bookmark| b.id == bookmark.id) {
                    found.push(bookmark);
                }
            }
            // A full page of repeats means the service is not paging.
            if received < limit || found.len() == before {
                return Ok(found);
            }
            page += 1;
        }
    }

    /// Writes one taxonomy change through to every stored record it touches,
    /// then to the loaded bookmarks.
    ///
    /// The affected set is read in full before any write so that updates do
    /// not shift the pages still being read. A failed write stops the cascade
    /// and leaves the loaded bookmarks and the lists untouched; records already
    /// written keep the change.
    async fn cascade(&mut self, selector: FilterState, change: Cascade<'_>) -> Result<(), StoreError> {
        let affected = self.collect_matching(selector).await.map_err(|e| {
            warn!(error = %e, "Reading records for taxonomy change failed");
            e
        })?;

        let now = now_millis();
        let mut written = Vec::new();
        for mut record in affected {
            if !Self::apply_cascade(&mut record, &change) {
                continue;
            }
            record.updated_at = now.max(record.updated_at);
            let id = record.id.clone();
            let confirmed = self.service.update(&id, &record).await.map_err(|e| {
                warn!(%id, error = %e, "Writing taxonomy change failed");
                e
            })?;
            written.push(confirmed);
        }

        for bookmark in &mut self.bookmarks {
            match written.iter().find(|w| w.id == bookmark.id) {
                Some(confirmed) => *bookmark = confirmed.clone(),
                None => {
                    Self::apply_cascade(bookmark, &change);
                }
            }
        }
        debug!(written = written.len(), "Cascaded taxonomy change");
        Ok(())
    }

    fn category_selector(id: &str) -> FilterState {
        FilterState {
            selected_category: Some(id.to_string()),
            ..FilterState::default()
        }
    }

    fn tag_selector(id: &str) -> FilterState {
        FilterState {
            selected_tags: [id.to_string()].into_iter().collect(),
            ..FilterState::default()
        }
    }

    pub fn add_category(&mut self, name: &str, icon: &str) -> Result<Category, StoreError> {
        let category = Category::new(Uuid::new_v4().to_string(), Self::require_name(name)?, icon.trim());
        self.categories.push(category.clone());
        info!(id = %category.id, name = %category.name, "Added category");
        Ok(category)
    }

    /// Edits a category and every bookmark embedding it, stored and loaded.
    pub async fn update_category(&mut self, id: &str, patch: CategoryPatch) -> Result<Category, StoreError> {
        let name = patch.name.as_deref().map(Self::require_name).transpose()?;
        let patch = CategoryPatch { name, ..patch };

        let mut updated = self
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(&mut updated);

        self.cascade(Self::category_selector(id), Cascade::CategoryChanged(&updated))
            .await?;
        if let Some(slot) = self.categories.iter_mut().find(|c| c.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Removes a category; its bookmarks, stored and loaded, become uncategorized.
    ///
    /// Returns true when the removed category was the active filter, which
    /// is cleared and pagination restarted. Unknown ids are a no-op.
    pub async fn remove_category(&mut self, id: &str) -> Result<bool, StoreError> {
        if !self.categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        self.cascade(Self::category_selector(id), Cascade::CategoryRemoved(id))
            .await?;
        self.categories.retain(|c| c.id != id);
        info!(%id, "Removed category");

        if self.filter.selected_category.as_deref() == Some(id) {
            self.set_selected_category(None);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn add_tag(&mut self, name: &str, color: &str) -> Result<Tag, StoreError> {
        let tag = Tag::new(Uuid::new_v4().to_string(), Self::require_name(name)?, color.trim());
        self.tags.push(tag.clone());
        info!(id = %tag.id, name = %tag.name, "Added tag");
        Ok(tag)
    }

    /// Edits a tag and every bookmark carrying it, stored and loaded.
    pub async fn update_tag(&mut self, id: &str, patch: TagPatch) -> Result<Tag, StoreError> {
        let name = patch.name.as_deref().map(Self::require_name).transpose()?;
        let patch = TagPatch { name, ..patch };

        let mut updated = self
            .tags
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(&mut updated);

        self.cascade(Self::tag_selector(id), Cascade::TagChanged(&updated))
            .await?;
        if let Some(slot) = self.tags.iter_mut().find(|t| t.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Removes a tag from the list and from every bookmark, stored and loaded.
    ///
    /// Returns true when the tag was part of the active filter, which is
    /// narrowed and pagination restarted. Unknown ids are a no-op.
    pub async fn remove_tag(&mut self, id: &str) -> Result<bool, StoreError> {
        if !self.tags.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        self.cascade(Self::tag_selector(id), Cascade::TagRemoved(id))
            .await?;
        self.tags.retain(|t| t.id != id);
        info!(%id, "Removed tag");

        if self.filter.selected_tags.contains(id) {
            self.toggle_tag(id);
            return Ok(true);
        }
        Ok(false)
    }
}
