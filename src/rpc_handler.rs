//! RPC method handler for the linkdeck JSON-RPC protocol.
//!
//! Kept separate from `rpc_server.rs` so it can be unit-tested without stdio.
//! `handle_method` dispatches one call to the collection store or settings
//! engine held by [`App`].

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::collection_store::FetchOutcome;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::bookmark::{BookmarkDraft, BookmarkPatch, CategoryPatch, TagPatch};

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

/// Decodes `params[key]` (or all of `params` when `key` is empty) into `T`.
fn decode<T: DeserializeOwned>(params: &Value, key: &str) -> Result<T, String> {
    let raw = if key.is_empty() {
        params.clone()
    } else {
        params.get(key).cloned().ok_or_else(|| format!("missing {}", key))?
    };
    serde_json::from_value(raw).map_err(|e| format!("invalid {}: {}", if key.is_empty() { "params" } else { key }, e))
}

fn outcome_json(outcome: &FetchOutcome) -> Value {
    match outcome {
        FetchOutcome::Applied { page, received, has_more } => {
            json!({"status": "applied", "page": page, "received": received, "hasMore": has_more})
        }
        FetchOutcome::Suppressed => json!({"status": "suppressed"}),
        FetchOutcome::Stale => json!({"status": "stale"}),
    }
}

fn snapshot_json(app: &App) -> Result<Value, String> {
    serde_json::to_value(app.store.snapshot()).map_err(|e| e.to_string())
}

/// Result of a fetch together with the state it produced.
fn fetch_json(app: &App, outcome: &FetchOutcome) -> Result<Value, String> {
    Ok(json!({"outcome": outcome_json(outcome), "state": snapshot_json(app)?}))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
/// Filter methods restart pagination and load page 1 before returning.
pub async fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),
        "state.snapshot" => snapshot_json(app),

        // ─── Pagination ───
        "bookmark.fetch_page" => {
            let page = params.get("page").and_then(|v| v.as_u64()).unwrap_or(1);
            let page = u32::try_from(page).map_err(|_| "invalid page".to_string())?;
            let outcome = app.store.fetch_page(page).await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }
        "bookmark.load_more" => {
            let outcome = app.store.load_more().await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }

        // ─── Bookmarks ───
        "bookmark.create" => {
            let draft: BookmarkDraft = decode(params, "")?;
            let created = app.store.create_bookmark(draft).await.map_err(|e| e.to_string())?;
            serde_json::to_value(created).map_err(|e| e.to_string())
        }
        "bookmark.update" => {
            let id = str_param(params, "id")?;
            let patch: BookmarkPatch = decode(params, "patch")?;
            let updated = app.store.update_bookmark(id, patch).await.map_err(|e| e.to_string())?;
            serde_json::to_value(updated).map_err(|e| e.to_string())
        }
        "bookmark.hide" => {
            let id = str_param(params, "id")?;
            let hidden = app.store.hide_bookmark(id).await.map_err(|e| e.to_string())?;
            serde_json::to_value(hidden).map_err(|e| e.to_string())
        }
        "bookmark.remove" => {
            let id = str_param(params, "id")?;
            app.store.remove_bookmark(id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Notes ───
        "note.add" => {
            let bookmark_id = str_param(params, "bookmarkId")?;
            let title = str_param(params, "title")?;
            let content = params.get("content").and_then(|v| v.as_str()).unwrap_or("");
            let note = app
                .store
                .add_note(bookmark_id, title, content)
                .await
                .map_err(|e| e.to_string())?;
            serde_json::to_value(note).map_err(|e| e.to_string())
        }
        "note.remove" => {
            let bookmark_id = str_param(params, "bookmarkId")?;
            let note_id = str_param(params, "noteId")?;
            app.store.remove_note(bookmark_id, note_id).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Filters ───
        "filter.search" => {
            let query = str_param(params, "query")?;
            app.store.set_search_query(query);
            let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }
        "filter.category" => {
            let category_id = params.get("categoryId").and_then(|v| v.as_str()).map(String::from);
            app.store.set_selected_category(category_id);
            let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }
        "filter.toggle_tag" => {
            let tag_id = str_param(params, "tagId")?;
            app.store.toggle_tag(tag_id);
            let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }
        "filter.clear" => {
            app.store.clear_filters();
            let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
            fetch_json(app, &outcome)
        }

        // ─── Categories ───
        "category.add" => {
            let name = str_param(params, "name")?;
            let icon = params.get("icon").and_then(|v| v.as_str()).unwrap_or("folder");
            let category = app.store.add_category(name, icon).map_err(|e| e.to_string())?;
            serde_json::to_value(category).map_err(|e| e.to_string())
        }
        "category.update" => {
            let id = str_param(params, "id")?;
            let patch: CategoryPatch = decode(params, "patch")?;
            let category = app.store.update_category(id, patch).await.map_err(|e| e.to_string())?;
            serde_json::to_value(category).map_err(|e| e.to_string())
        }
        "category.remove" => {
            let id = str_param(params, "id")?;
            let filter_cleared = app.store.remove_category(id).await.map_err(|e| e.to_string())?;
            if filter_cleared {
                let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
                return fetch_json(app, &outcome);
            }
            Ok(json!({"ok": true}))
        }

        // ─── Tags ───
        "tag.add" => {
            let name = str_param(params, "name")?;
            let color = params.get("color").and_then(|v| v.as_str()).unwrap_or("gray");
            let tag = app.store.add_tag(name, color).map_err(|e| e.to_string())?;
            serde_json::to_value(tag).map_err(|e| e.to_string())
        }
        "tag.update" => {
            let id = str_param(params, "id")?;
            let patch: TagPatch = decode(params, "patch")?;
            let tag = app.store.update_tag(id, patch).await.map_err(|e| e.to_string())?;
            serde_json::to_value(tag).map_err(|e| e.to_string())
        }
        "tag.remove" => {
            let id = str_param(params, "id")?;
            let filter_changed = app.store.remove_tag(id).await.map_err(|e| e.to_string())?;
            if filter_changed {
                let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
                return fetch_json(app, &outcome);
            }
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let settings = app.settings_engine.get_settings();
            serde_json::to_value(settings).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            app.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            // Page size applies live; backend changes take effect on restart.
            let page_size = app.settings_engine.get_settings().pagination.page_size;
            if app.store.set_page_size(page_size) {
                let outcome = app.store.refresh().await.map_err(|e| e.to_string())?;
                return fetch_json(app, &outcome);
            }
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
