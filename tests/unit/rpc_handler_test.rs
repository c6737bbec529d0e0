//! Unit tests for the RPC handler: the JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests run through the same code path as the `linkdeck-rpc` binary,
//! against an in-memory local service seeded with 14 bookmarks and a settings
//! file in a temporary directory.

use serde_json::{json, Value};
use tempfile::TempDir;

use linkdeck::app::{App, Backend};
use linkdeck::rpc_handler::handle_method;
use linkdeck::services::local_service::LocalBookmarkService;
use linkdeck::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Create a fresh App with one page already loaded.
async fn setup() -> (App, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let settings_path = tmp.path().join("settings.json").to_string_lossy().to_string();
    let service = LocalBookmarkService::open_in_memory().expect("Failed to open database");
    service.seed_demo(14).expect("Failed to seed");

    let mut app = App::with_backend(SettingsEngine::new(Some(settings_path)), Backend::Local(service));
    app.startup().await.expect("Failed to load first page");
    (app, tmp)
}

async fn call(app: &mut App, method: &str, params: Value) -> Result<Value, String> {
    handle_method(app, method, &params).await
}

fn visible(state: &Value) -> usize {
    state["bookmarks"].as_array().map(|a| a.len()).unwrap_or(0)
}

// ─── Ping ───

#[tokio::test]
async fn test_ping() {
    let (mut app, _tmp) = setup().await;
    let res = call(&mut app, "ping", json!({})).await.unwrap();
    assert_eq!(res["pong"], true);
}

// ─── Unknown method ───

#[tokio::test]
async fn test_unknown_method_returns_error() {
    let (mut app, _tmp) = setup().await;
    let res = call(&mut app, "nonexistent.method", json!({})).await;
    assert!(res.unwrap_err().contains("unknown method"));
}

// ─── Snapshot and pagination ───

#[tokio::test]
async fn test_snapshot_uses_camel_case() {
    let (mut app, _tmp) = setup().await;
    let state = call(&mut app, "state.snapshot", json!({})).await.unwrap();

    assert_eq!(visible(&state), 12);
    assert_eq!(state["pagination"]["hasMore"], true);
    assert_eq!(state["pagination"]["isLoading"], false);
    assert_eq!(state["filter"]["searchQuery"], "");
    assert_eq!(state["categories"].as_array().unwrap().len(), 4);
    assert!(state["bookmarks"][0].get("createdAt").is_some());
}

#[tokio::test]
async fn test_load_more_until_exhausted() {
    let (mut app, _tmp) = setup().await;

    let res = call(&mut app, "bookmark.load_more", json!({})).await.unwrap();
    assert_eq!(res["outcome"]["status"], "applied");
    assert_eq!(res["outcome"]["received"], 2);
    assert_eq!(visible(&res["state"]), 14);
    assert_eq!(res["state"]["phase"], "Exhausted");

    let res = call(&mut app, "bookmark.load_more", json!({})).await.unwrap();
    assert_eq!(res["outcome"]["status"], "suppressed");
}

#[tokio::test]
async fn test_fetch_page_rejects_oversized_page() {
    let (mut app, _tmp) = setup().await;
    let res = call(&mut app, "bookmark.fetch_page", json!({"page": u64::MAX})).await;
    assert!(res.is_err());
}

// ─── Filters ───

#[tokio::test]
async fn test_filter_methods_reload_first_page() {
    let (mut app, _tmp) = setup().await;

    let res = call(&mut app, "filter.search", json!({"query": "bookmark 1"})).await.unwrap();
    assert_eq!(res["outcome"]["page"], 1);
    assert_eq!(visible(&res["state"]), 6);

    let res = call(&mut app, "filter.category", json!({"categoryId": "1"})).await.unwrap();
    assert_eq!(res["state"]["filter"]["selectedCategory"], "1");
    assert!(res["state"]["bookmarks"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["category"]["id"] == "1"));

    let res = call(&mut app, "filter.clear", json!({})).await.unwrap();
    assert_eq!(visible(&res["state"]), 12);
}

#[tokio::test]
async fn test_toggle_tag_twice() {
    let (mut app, _tmp) = setup().await;

    let res = call(&mut app, "filter.toggle_tag", json!({"tagId": "3"})).await.unwrap();
    assert_eq!(res["state"]["filter"]["selectedTags"], json!(["3"]));
    let res = call(&mut app, "filter.toggle_tag", json!({"tagId": "3"})).await.unwrap();
    assert_eq!(res["state"]["filter"]["selectedTags"], json!([]));
}

// ─── Bookmarks and notes ───

#[tokio::test]
async fn test_bookmark_create_update_hide_remove() {
    let (mut app, _tmp) = setup().await;

    let created = call(
        &mut app,
        "bookmark.create",
        json!({"title": "Tokio", "url": "https://tokio.rs/tokio/tutorial", "categoryId": "3", "tagIds": ["3"]}),
    )
    .await
    .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["favicon"], "https://tokio.rs/favicon.ico");
    assert_eq!(created["category"]["name"], "Learning");

    let updated = call(
        &mut app,
        "bookmark.update",
        json!({"id": id, "patch": {"description": "async runtime", "customStyle": {"title": {"color": "red"}}}}),
    )
    .await
    .unwrap();
    assert_eq!(updated["description"], "async runtime");
    assert_eq!(updated["customStyle"]["title"]["color"], "red");

    let hidden = call(&mut app, "bookmark.hide", json!({"id": id})).await.unwrap();
    assert_eq!(hidden["hidden"], true);

    call(&mut app, "bookmark.remove", json!({"id": id})).await.unwrap();
    call(&mut app, "bookmark.remove", json!({"id": id})).await.unwrap();
}

#[tokio::test]
async fn test_bookmark_update_null_clears_optional_fields() {
    let (mut app, _tmp) = setup().await;

    call(
        &mut app,
        "bookmark.update",
        json!({"id": "bookmark-0", "patch": {"customStyle": {"title": {"color": "red"}}}}),
    )
    .await
    .unwrap();
    let cleared = call(
        &mut app,
        "bookmark.update",
        json!({"id": "bookmark-0", "patch": {"description": null, "customStyle": null}}),
    )
    .await
    .unwrap();
    assert_eq!(cleared["description"], Value::Null);
    assert_eq!(cleared["customStyle"], Value::Null);

    // An absent field leaves the stored value alone.
    let renamed = call(&mut app, "bookmark.update", json!({"id": "bookmark-1", "patch": {"title": "Renamed"}}))
        .await
        .unwrap();
    assert_eq!(renamed["description"], "Description for bookmark 2");
}

#[tokio::test]
async fn test_bookmark_create_validation_error() {
    let (mut app, _tmp) = setup().await;
    let err = call(&mut app, "bookmark.create", json!({"title": "", "url": "https://a.io"}))
        .await
        .unwrap_err();
    assert!(err.starts_with("Invalid bookmark data"));

    let err = call(&mut app, "bookmark.create", json!({"url": "https://a.io"})).await.unwrap_err();
    assert!(err.contains("invalid params"));
}

#[tokio::test]
async fn test_update_unknown_bookmark_is_not_found() {
    let (mut app, _tmp) = setup().await;
    let err = call(&mut app, "bookmark.update", json!({"id": "ghost", "patch": {}}))
        .await
        .unwrap_err();
    assert_eq!(err, "Not found: ghost");
}

#[tokio::test]
async fn test_note_add_and_remove() {
    let (mut app, _tmp) = setup().await;

    let note = call(
        &mut app,
        "note.add",
        json!({"bookmarkId": "bookmark-0", "title": "Remember", "content": "check chapter 3"}),
    )
    .await
    .unwrap();
    let note_id = note["id"].as_str().unwrap().to_string();
    assert_eq!(note["content"], "check chapter 3");

    call(&mut app, "note.remove", json!({"bookmarkId": "bookmark-0", "noteId": note_id}))
        .await
        .unwrap();
    let state = call(&mut app, "state.snapshot", json!({})).await.unwrap();
    assert_eq!(state["bookmarks"][0]["notes"], json!([]));
}

#[tokio::test]
async fn test_missing_params_are_reported() {
    let (mut app, _tmp) = setup().await;
    assert_eq!(call(&mut app, "bookmark.remove", json!({})).await.unwrap_err(), "missing id");
    assert_eq!(call(&mut app, "filter.search", json!({})).await.unwrap_err(), "missing query");
    assert_eq!(
        call(&mut app, "note.add", json!({"title": "x"})).await.unwrap_err(),
        "missing bookmarkId"
    );
}

// ─── Categories and tags ───

#[tokio::test]
async fn test_category_lifecycle() {
    let (mut app, _tmp) = setup().await;

    let added = call(&mut app, "category.add", json!({"name": "Recipes", "icon": "utensils"}))
        .await
        .unwrap();
    assert_eq!(added["name"], "Recipes");

    let renamed = call(&mut app, "category.update", json!({"id": "2", "patch": {"name": "Home"}}))
        .await
        .unwrap();
    assert_eq!(renamed, json!({"id": "2", "name": "Home", "icon": "user"}));

    call(&mut app, "filter.category", json!({"categoryId": "2"})).await.unwrap();
    let res = call(&mut app, "category.remove", json!({"id": "2"})).await.unwrap();
    assert_eq!(res["state"]["filter"]["selectedCategory"], Value::Null);
    assert!(res["state"]["categories"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["id"] != "2"));
}

#[tokio::test]
async fn test_tag_lifecycle() {
    let (mut app, _tmp) = setup().await;

    let tag = call(&mut app, "tag.add", json!({"name": "Rust"})).await.unwrap();
    assert_eq!(tag["color"], "gray");
    let id = tag["id"].as_str().unwrap().to_string();

    let updated = call(&mut app, "tag.update", json!({"id": id, "patch": {"color": "orange"}}))
        .await
        .unwrap();
    assert_eq!(updated["color"], "orange");

    let res = call(&mut app, "tag.remove", json!({"id": id})).await.unwrap();
    assert_eq!(res, json!({"ok": true}));
    assert!(call(&mut app, "tag.update", json!({"id": id, "patch": {}})).await.is_err());
}

// ─── Settings ───

#[tokio::test]
async fn test_settings_get_and_set() {
    let (mut app, tmp) = setup().await;

    let settings = call(&mut app, "settings.get", json!({})).await.unwrap();
    assert_eq!(settings["pagination"]["page_size"], 12);

    call(&mut app, "settings.set", json!({"key": "pagination.page_size", "value": 20}))
        .await
        .unwrap();
    assert!(tmp.path().join("settings.json").exists());

    let err = call(&mut app, "settings.set", json!({"key": "nope", "value": 1})).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_page_size_setting_applies_without_restart() {
    let (mut app, _tmp) = setup().await;

    let res = call(&mut app, "settings.set", json!({"key": "pagination.page_size", "value": 5}))
        .await
        .unwrap();
    assert_eq!(res["outcome"]["received"], 5);
    assert_eq!(res["state"]["pagination"]["limit"], 5);
    assert_eq!(visible(&res["state"]), 5);

    let more = call(&mut app, "bookmark.load_more", json!({})).await.unwrap();
    assert_eq!(more["outcome"]["page"], 2);
    assert_eq!(visible(&more["state"]), 10);

    // Writing the same size again keeps what is loaded.
    let same = call(&mut app, "settings.set", json!({"key": "pagination.page_size", "value": 5}))
        .await
        .unwrap();
    assert_eq!(same, json!({"ok": true}));
}

#[tokio::test]
async fn test_app_from_loaded_settings_uses_page_size() {
    let tmp = TempDir::new().unwrap();
    let settings_path = tmp.path().join("settings.json").to_string_lossy().to_string();
    let db_path = tmp.path().join("bookmarks.db").to_string_lossy().to_string();

    let mut engine = SettingsEngine::new(Some(settings_path.clone()));
    engine.set_value("backend.local_db_path", json!(db_path)).unwrap();
    engine.set_value("pagination.page_size", json!(5)).unwrap();

    let mut reloaded = SettingsEngine::new(Some(settings_path));
    reloaded.load().unwrap();
    let app = App::from_settings(reloaded).unwrap();
    assert_eq!(app.store.pagination().limit, 5);
    assert!(tmp.path().join("bookmarks.db").exists());
}
