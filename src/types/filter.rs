use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The active search/category/tag selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_query: String,
    pub selected_category: Option<String>,
    pub selected_tags: BTreeSet<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.search_query.is_empty()
            && self.selected_category.is_none()
            && self.selected_tags.is_empty()
    }

    /// Adds the tag if absent, removes it if present.
    pub fn toggle_tag(&mut self, tag_id: &str) {
        if !self.selected_tags.remove(tag_id) {
            self.selected_tags.insert(tag_id.to_string());
        }
    }
}
