//! linkdeck: a paginated, filterable bookmark collection.
//!
//! Console demo: drives the collection store against an in-memory local
//! service seeded with sample bookmarks.

use std::error::Error;

use linkdeck::app::init_logging;
use linkdeck::managers::collection_store::{CollectionStore, FetchOutcome};
use linkdeck::services::local_service::LocalBookmarkService;
use linkdeck::services::remote::BookmarkService;
use linkdeck::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use linkdeck::types::bookmark::{BookmarkDraft, BookmarkPatch, CategoryPatch};
use linkdeck::types::pagination::DEFAULT_PAGE_SIZE;

type Store = CollectionStore<LocalBookmarkService>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging("warn");

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 linkdeck v{} — Demo Mode                  ║", env!("CARGO_PKG_VERSION"));
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    demo_settings();

    let service = LocalBookmarkService::open_in_memory()?;
    let seeded = service.seed_demo(14)?;
    println!("  Seeded {} bookmarks into an in-memory database", seeded.len());
    println!();

    let mut store = CollectionStore::new(service, DEFAULT_PAGE_SIZE);
    demo_pagination(&mut store).await?;
    demo_filters(&mut store).await?;
    demo_stale_response(&mut store).await?;
    demo_bookmarks(&mut store).await?;
    demo_taxonomy(&mut store).await?;

    println!("═══════════════════════════════════════════════════════════════");
    println!("  ✅ Demo finished");
    println!("═══════════════════════════════════════════════════════════════");
    Ok(())
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  📦 {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn describe(outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Applied { page, received, has_more } => {
            format!("page {} applied, {} received, hasMore={}", page, received, has_more)
        }
        FetchOutcome::Suppressed => "suppressed".to_string(),
        FetchOutcome::Stale => "stale, discarded".to_string(),
    }
}

fn demo_settings() {
    section("Settings");
    let engine = SettingsEngine::new(None);
    let settings = engine.get_settings();
    println!("  Config path: {}", engine.get_config_path());
    println!("  Page size: {}", settings.pagination.page_size);
    println!("  Backend: {:?} (remote url {})", settings.backend.kind, settings.backend.effective_base_url());
    println!();
}

async fn demo_pagination(store: &mut Store) -> Result<(), Box<dyn Error>> {
    section("Pagination");
    let first = store.refresh().await?;
    println!("  refresh   -> {} | loaded {}", describe(&first), store.bookmarks().len());
    let second = store.load_more().await?;
    println!("  load_more -> {} | loaded {}", describe(&second), store.bookmarks().len());
    let third = store.load_more().await?;
    println!("  load_more -> {} | phase {:?}", describe(&third), store.phase());
    println!();
    Ok(())
}

async fn demo_filters(store: &mut Store) -> Result<(), Box<dyn Error>> {
    section("Filters");
    store.set_search_query("bookmark 1");
    let outcome = store.refresh().await?;
    println!("  search \"bookmark 1\" -> {} | visible {}", describe(&outcome), store.visible_bookmarks().len());

    store.set_selected_category(Some("1".to_string()));
    store.refresh().await?;
    println!("  + category Work   -> visible {}", store.visible_bookmarks().len());

    store.clear_filters();
    store.refresh().await?;
    println!("  cleared           -> visible {}", store.visible_bookmarks().len());
    println!();
    Ok(())
}

async fn demo_stale_response(store: &mut Store) -> Result<(), Box<dyn Error>> {
    section("Stale responses");
    store.set_search_query("foo");
    let old = store.begin_fetch(1).ok_or("fetch suppressed")?;
    store.set_search_query("bar");
    let current = store.begin_fetch(1).ok_or("fetch suppressed")?;

    let current_result = store.service().list(&current.query).await;
    let old_result = store.service().list(&old.query).await;
    println!("  \"bar\" arrives first -> {}", describe(&store.complete_fetch(current, current_result)?));
    println!("  \"foo\" arrives late  -> {}", describe(&store.complete_fetch(old, old_result)?));

    store.clear_filters();
    store.refresh().await?;
    println!();
    Ok(())
}

async fn demo_bookmarks(store: &mut Store) -> Result<(), Box<dyn Error>> {
    section("Bookmarks");
    let created = store
        .create_bookmark(BookmarkDraft {
            title: "The Rust Book".to_string(),
            url: "https://doc.rust-lang.org/book/".to_string(),
            category_id: Some("3".to_string()),
            tag_ids: vec!["2".to_string(), "3".to_string()],
            ..BookmarkDraft::default()
        })
        .await?;
    println!("  Created {} ({})", created.title, created.favicon.as_deref().unwrap_or("-"));

    let moved = store
        .update_bookmark(
            &created.id,
            BookmarkPatch {
                url: Some("https://rust-lang.github.io/async-book/".to_string()),
                ..BookmarkPatch::default()
            },
        )
        .await?;
    println!("  URL changed, favicon now {}", moved.favicon.as_deref().unwrap_or("-"));

    let note = store.add_note(&created.id, "Chapter 16", "Fearless concurrency").await?;
    println!("  Added note \"{}\"", note.title);
    store.remove_note(&created.id, &note.id).await?;

    let before = store.visible_bookmarks().len();
    store.hide_bookmark(&created.id).await?;
    println!("  Hidden: visible {} -> {}", before, store.visible_bookmarks().len());

    store.remove_bookmark(&created.id).await?;
    store.remove_bookmark(&created.id).await?;
    println!("  Removed twice without error, loaded {}", store.bookmarks().len());
    println!();
    Ok(())
}

async fn demo_taxonomy(store: &mut Store) -> Result<(), Box<dyn Error>> {
    section("Categories and tags");
    store
        .update_category(
            "1",
            CategoryPatch {
                name: Some("Job".to_string()),
                icon: None,
            },
        )
        .await?;
    let renamed = store
        .bookmarks()
        .iter()
        .filter(|b| b.category.as_ref().is_some_and(|c| c.name == "Job"))
        .count();
    println!("  Renamed Work -> Job, {} bookmarks follow", renamed);

    store.set_selected_category(Some("1".to_string()));
    store.refresh().await?;
    let cleared = store.remove_category("1").await?;
    let uncategorized = store.bookmarks().iter().filter(|b| b.category_id() == "uncategorized").count();
    println!("  Removed Job: {} now uncategorized, filter cleared: {}", uncategorized, cleared);

    let tag = store.add_tag("Rust", "orange")?;
    println!("  Added tag {} ({})", tag.name, tag.id);
    store.remove_tag(&tag.id).await?;
    println!("  Tags now: {}", store.tags().iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", "));
    println!();
    Ok(())
}
