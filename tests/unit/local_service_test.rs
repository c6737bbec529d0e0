//! Unit tests for the SQLite-backed LocalBookmarkService.

use std::time::{Duration, Instant};

use linkdeck::database::Database;
use linkdeck::services::local_service::LocalBookmarkService;
use linkdeck::services::remote::{BookmarkService, ListQuery};
use linkdeck::types::bookmark::{Bookmark, NewBookmark, Tag};
use linkdeck::types::errors::StoreError;
use linkdeck::types::filter::FilterState;
use tempfile::TempDir;

fn query(page: u32, filter: FilterState) -> ListQuery {
    ListQuery { page, limit: 12, filter }
}

fn new_bookmark(title: &str, url: &str) -> NewBookmark {
    NewBookmark {
        title: title.to_string(),
        url: url.to_string(),
        description: None,
        category: None,
        tags: vec![],
        notes: vec![],
        custom_style: None,
        favicon: None,
        hidden: false,
        created_at: 1,
        updated_at: 1,
    }
}

fn seeded(count: usize) -> LocalBookmarkService {
    let service = LocalBookmarkService::open_in_memory().expect("open_in_memory failed");
    service.seed_demo(count).expect("seed failed");
    service
}

#[test]
fn test_seed_demo_rotates_taxonomy() {
    let service = LocalBookmarkService::open_in_memory().unwrap();
    let seeded = service.seed_demo(5).unwrap();

    assert_eq!(service.count().unwrap(), 5);
    assert_eq!(seeded[0].id, "bookmark-0");
    assert_eq!(seeded[0].title, "Bookmark 1");
    assert_eq!(seeded[0].url, "https://example.com/bookmark-1");
    assert_eq!(seeded[0].favicon.as_deref(), Some("https://example.com/favicon.ico"));
    assert_eq!(seeded[4].category.as_ref().unwrap().id, "1");
    assert_eq!(seeded[1].tags[0].id, "2");
    assert!(seeded[0].created_at > seeded[1].created_at);
}

#[tokio::test]
async fn test_list_pages_in_insertion_order() {
    let service = seeded(14);

    let first = service.list(&query(1, FilterState::default())).await.unwrap();
    assert_eq!(first.bookmarks.len(), 12);
    assert!(first.has_more);
    assert_eq!(first.bookmarks[0].id, "bookmark-0");

    let second = service.list(&query(2, FilterState::default())).await.unwrap();
    assert_eq!(second.bookmarks.len(), 2);
    assert!(!second.has_more);
    assert_eq!(second.bookmarks[1].id, "bookmark-13");

    let beyond = service.list(&query(5, FilterState::default())).await.unwrap();
    assert!(beyond.bookmarks.is_empty());
}

#[tokio::test]
async fn test_list_applies_filter_before_paging() {
    let service = seeded(14);
    let filter = FilterState {
        selected_category: Some("2".to_string()),
        ..FilterState::default()
    };

    let page = service.list(&query(1, filter)).await.unwrap();
    // Indices 1, 5, 9, 13.
    assert_eq!(page.bookmarks.len(), 4);
    assert!(page.bookmarks.iter().all(|b| b.category_id() == "2"));
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_create_assigns_id_and_persists() {
    let service = LocalBookmarkService::open_in_memory().unwrap();
    let created = service.create(&new_bookmark("Docs", "https://docs.rs")).await.unwrap();

    assert!(!created.id.is_empty());
    assert_eq!(service.get(&created.id).unwrap(), Some(created));
}

#[tokio::test]
async fn test_create_requires_title_and_url() {
    let service = LocalBookmarkService::open_in_memory().unwrap();
    let err = service.create(&new_bookmark(" ", "https://docs.rs")).await.unwrap_err();
    assert!(matches!(err, StoreError::ValidationFailure(_)));
    assert_eq!(service.count().unwrap(), 0);
}

#[tokio::test]
async fn test_update_replaces_record_and_keeps_position() {
    let service = seeded(3);
    let mut changed: Bookmark = service.get("bookmark-0").unwrap().unwrap();
    changed.title = "Renamed".to_string();
    changed.tags = vec![Tag::new("4", "Read Later", "purple")];

    let stored = service.update("bookmark-0", &changed).await.unwrap();
    assert_eq!(stored, changed);

    let page = service.list(&query(1, FilterState::default())).await.unwrap();
    assert_eq!(page.bookmarks[0].title, "Renamed");
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let service = seeded(1);
    let record = service.get("bookmark-0").unwrap().unwrap();
    let err = service.update("ghost", &record).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound("ghost".to_string()));
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let service = seeded(2);
    service.delete("bookmark-0").await.unwrap();
    service.delete("bookmark-0").await.unwrap();
    assert_eq!(service.count().unwrap(), 1);
    assert_eq!(service.get("bookmark-0").unwrap(), None);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("linkdeck.db");
    {
        let service = LocalBookmarkService::new(Database::open(&path).unwrap());
        service.seed_demo(3).unwrap();
    }
    let reopened = LocalBookmarkService::new(Database::open(&path).unwrap());
    assert_eq!(reopened.count().unwrap(), 3);
}

#[tokio::test]
async fn test_malformed_rows_are_skipped() {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute(
            "INSERT INTO bookmarks (id, position, title, url, category_id, record, created_at, updated_at) \
             VALUES ('broken', 0, 't', 'u', 'uncategorized', '{not json', 0, 0)",
            [],
        )
        .unwrap();
    let service = LocalBookmarkService::new(db);
    service.seed_demo(2).unwrap();

    let page = service.list(&query(1, FilterState::default())).await.unwrap();
    assert_eq!(page.bookmarks.len(), 2);
}

#[tokio::test]
async fn test_simulated_latency_delays_calls() {
    let service = seeded(1).with_latency(Duration::from_millis(30));
    let started = Instant::now();
    service.list(&query(1, FilterState::default())).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}
