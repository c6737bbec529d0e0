use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Id of the category every bookmark falls back to when its own is removed.
pub const UNCATEGORIZED_ID: &str = "uncategorized";

/// Returns the current UNIX timestamp in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Single-select grouping label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }

    /// The sentinel assigned to bookmarks whose category was deleted.
    pub fn uncategorized() -> Self {
        Self::new(UNCATEGORIZED_ID, "Uncategorized", "folder")
    }

    /// Categories a fresh collection starts with.
    pub fn defaults() -> Vec<Category> {
        vec![
            Self::new("1", "Work", "briefcase"),
            Self::new("2", "Personal", "user"),
            Self::new("3", "Learning", "book-open"),
            Self::new("4", "Entertainment", "tv"),
        ]
    }
}

/// Multi-select label, filtered with AND semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Tags a fresh collection starts with.
    pub fn defaults() -> Vec<Tag> {
        vec![
            Self::new("1", "Important", "red"),
            Self::new("2", "Reference", "blue"),
            Self::new("3", "Tutorial", "green"),
            Self::new("4", "Read Later", "purple"),
        ]
    }
}

/// A note attached to exactly one bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Style property overrides keyed by property name (e.g. `"color"`).
pub type StyleRules = BTreeMap<String, String>;

/// Per-field presentation overrides for a bookmark card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<StyleRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<StyleRules>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<StyleRules>,
}

/// A saved link.
///
/// `category` and `tags` are denormalized copies of the collection's
/// authoritative entries and are rewritten whenever those change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub custom_style: Option<CustomStyle>,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Bookmark {
    /// Category id used for filtering; a missing category counts as uncategorized.
    pub fn category_id(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.id.as_str())
            .unwrap_or(UNCATEGORIZED_ID)
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }
}

/// A bookmark record before the service has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub notes: Vec<Note>,
    pub custom_style: Option<CustomStyle>,
    pub favicon: Option<String>,
    pub hidden: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NewBookmark {
    pub fn with_id(self, id: String) -> Bookmark {
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            description: self.description,
            category: self.category,
            tags: self.tags,
            notes: self.notes,
            custom_style: self.custom_style,
            favicon: self.favicon,
            hidden: self.hidden,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User input for a new bookmark. Category and tags are referenced by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub custom_style: Option<CustomStyle>,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `Some(None)` (JSON `null`) clears the description.
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<Vec<Note>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub custom_style: Option<Option<CustomStyle>>,
    #[serde(default)]
    pub hidden: Option<bool>,
}

/// Tells an absent field (`None`) apart from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            category.icon = icon.clone();
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TagPatch {
    pub fn apply(&self, tag: &mut Tag) {
        if let Some(name) = &self.name {
            tag.name = name.clone();
        }
        if let Some(color) = &self.color {
            tag.color = color.clone();
        }
    }
}
