//! Filter Engine: decides which bookmarks match a [`FilterState`].
//!
//! The same predicate runs inside the local service (server-side filtering)
//! and over the store's loaded collection (client-side filtering), so both
//! placements agree.

use crate::types::bookmark::Bookmark;
use crate::types::filter::FilterState;

/// Case-insensitive substring match on title or description.
/// An empty query matches everything.
pub fn matches_search(bookmark: &Bookmark, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    bookmark.title.to_lowercase().contains(&needle)
        || bookmark
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

pub fn matches_category(bookmark: &Bookmark, category_id: Option<&str>) -> bool {
    category_id.map_or(true, |id| bookmark.category_id() == id)
}

/// True when the bookmark carries every selected tag (AND semantics).
pub fn matches_tags<'a, I>(bookmark: &Bookmark, tag_ids: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    tag_ids.into_iter().all(|id| bookmark.has_tag(id))
}

pub fn matches(bookmark: &Bookmark, filter: &FilterState) -> bool {
    matches_search(bookmark, &filter.search_query)
        && matches_category(bookmark, filter.selected_category.as_deref())
        && matches_tags(bookmark, &filter.selected_tags)
}

/// Returns the matching bookmarks in their original order.
pub fn filter_bookmarks<'a>(bookmarks: &'a [Bookmark], filter: &FilterState) -> Vec<&'a Bookmark> {
    bookmarks.iter().filter(|b| matches(b, filter)).collect()
}
