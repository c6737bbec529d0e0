//! Local implementation of [`BookmarkService`] backed by SQLite.
//!
//! Stands in for the bookmark API when running offline: filters with the
//! same [`filter_engine`](super::filter_engine) the store uses, paginates by
//! insertion order and can add an artificial delay to every call.

use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::favicon::favicon_for;
use super::filter_engine;
use super::remote::{BookmarkService, ListPage, ListQuery};
use crate::database::Database;
use crate::types::bookmark::{now_millis, Bookmark, Category, NewBookmark, Tag};
use crate::types::errors::StoreError;

const DAY_MILLIS: i64 = 86_400_000;

pub struct LocalBookmarkService {
    db: Mutex<Database>,
    latency: Duration,
}

impl LocalBookmarkService {
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            latency: Duration::ZERO,
        }
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Delays every call by `latency` to mimic a remote round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StoreError::NetworkFailure(format!("local database lock poisoned: {}", e)))?;
        f(db.connection())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn encode(bookmark: &Bookmark) -> Result<String, StoreError> {
        serde_json::to_string(bookmark).map_err(|e| StoreError::ValidationFailure(e.to_string()))
    }

    /// All stored bookmarks in insertion order. Undecodable rows are skipped.
    fn load_all(conn: &Connection) -> Result<Vec<Bookmark>, StoreError> {
        let mut stmt = conn.prepare("SELECT id, record FROM bookmarks ORDER BY position")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut results = Vec::new();
        for row in rows {
            let (id, record) = row?;
            match serde_json::from_str::<Bookmark>(&record) {
                Ok(bookmark) => results.push(bookmark),
                Err(e) => tracing::warn!(%id, "Skipping malformed bookmark row: {e}"),
            }
        }
        Ok(results)
    }

    fn insert(conn: &Connection, bookmark: &Bookmark) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO bookmarks (id, position, title, url, category_id, record, created_at, updated_at) \
             VALUES (?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM bookmarks), ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                bookmark.id,
                bookmark.title,
                bookmark.url,
                bookmark.category_id(),
                Self::encode(bookmark)?,
                bookmark.created_at,
                bookmark.updated_at
            ],
        )?;
        Ok(())
    }

    fn list_now(&self, query: &ListQuery) -> Result<ListPage, StoreError> {
        let all = self.with_conn(Self::load_all)?;
        let matching = filter_engine::filter_bookmarks(&all, &query.filter);
        let start = query.offset().min(matching.len());
        let end = (start + query.limit).min(matching.len());
        Ok(ListPage {
            bookmarks: matching[start..end].iter().map(|b| (*b).clone()).collect(),
            has_more: end < matching.len(),
        })
    }

    fn create_now(&self, record: &NewBookmark) -> Result<Bookmark, StoreError> {
        if record.title.trim().is_empty() || record.url.trim().is_empty() {
            return Err(StoreError::ValidationFailure("title and url are required".to_string()));
        }
        let bookmark = record.clone().with_id(Uuid::new_v4().to_string());
        self.with_conn(|conn| Self::insert(conn, &bookmark))?;
        Ok(bookmark)
    }

    fn update_now(&self, id: &str, record: &Bookmark) -> Result<Bookmark, StoreError> {
        let mut stored = record.clone();
        stored.id = id.to_string();
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE bookmarks SET title = ?1, url = ?2, category_id = ?3, record = ?4, updated_at = ?5 WHERE id = ?6",
                params![
                    stored.title,
                    stored.url,
                    stored.category_id(),
                    Self::encode(&stored)?,
                    stored.updated_at,
                    id
                ],
            )?;
            if affected == 0 {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })?;
        Ok(stored)
    }

    fn delete_now(&self, id: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
            Ok(())
        })
    }

    /// Fetches one record by id.
    pub fn get(&self, id: &str) -> Result<Option<Bookmark>, StoreError> {
        self.with_conn(|conn| {
            let record: Option<String> = conn
                .query_row("SELECT record FROM bookmarks WHERE id = ?1", params![id], |row| row.get(0))
                .optional()?;
            record
                .map(|r| serde_json::from_str(&r).map_err(|e| StoreError::NetworkFailure(e.to_string())))
                .transpose()
        })
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }

    /// Inserts `count` generated bookmarks spread over the default categories
    /// and tags, newest first.
    pub fn seed_demo(&self, count: usize) -> Result<Vec<Bookmark>, StoreError> {
        let categories = Category::defaults();
        let tags = Tag::defaults();
        let now = now_millis();

        let seeded: Vec<Bookmark> = (0..count)
            .map(|i| {
                let n = i + 1;
                let url = format!("https://example.com/bookmark-{}", n);
                let created = now - i as i64 * DAY_MILLIS;
                Bookmark {
                    id: format!("bookmark-{}", i),
                    title: format!("Bookmark {}", n),
                    favicon: favicon_for(&url),
                    url,
                    description: Some(format!("Description for bookmark {}", n)),
                    category: Some(categories[i % categories.len()].clone()),
                    tags: vec![tags[i % tags.len()].clone()],
                    notes: vec![],
                    custom_style: None,
                    hidden: false,
                    created_at: created,
                    updated_at: created,
                }
            })
            .collect();

        self.with_conn(|conn| {
            for bookmark in &seeded {
                Self::insert(conn, bookmark)?;
            }
            Ok(())
        })?;
        Ok(seeded)
    }
}

impl BookmarkService for LocalBookmarkService {
    async fn list(&self, query: &ListQuery) -> Result<ListPage, StoreError> {
        self.simulate_latency().await;
        self.list_now(query)
    }

    async fn create(&self, record: &NewBookmark) -> Result<Bookmark, StoreError> {
        self.simulate_latency().await;
        self.create_now(record)
    }

    async fn update(&self, id: &str, record: &Bookmark) -> Result<Bookmark, StoreError> {
        self.simulate_latency().await;
        self.update_now(id, record)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.simulate_latency().await;
        self.delete_now(id)
    }
}
