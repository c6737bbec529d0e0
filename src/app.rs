//! App Core for linkdeck.
//!
//! Wires settings, the configured bookmark service and the collection store
//! together. Both binaries and the RPC handler work through [`App`].

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::database::Database;
use crate::managers::collection_store::CollectionStore;
use crate::platform;
use crate::services::http_service::HttpBookmarkService;
use crate::services::local_service::LocalBookmarkService;
use crate::services::remote::{BookmarkService, ListPage, ListQuery};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;
use crate::types::settings::{BackendKind, BackendSettings};

/// Installs the stderr `tracing` subscriber. `RUST_LOG` wins over `filter`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The bookmark service selected by `backend.kind`.
pub enum Backend {
    Local(LocalBookmarkService),
    Remote(HttpBookmarkService),
}

impl Backend {
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, StoreError> {
        match settings.kind {
            BackendKind::Local => {
                let path = settings.local_db_path.clone().unwrap_or_else(|| {
                    platform::get_data_dir()
                        .join("linkdeck.db")
                        .to_string_lossy()
                        .to_string()
                });
                tracing::info!(%path, "Using local bookmark database");
                let service = LocalBookmarkService::new(Database::open(&path)?)
                    .with_latency(Duration::from_millis(settings.simulated_latency_ms));
                Ok(Backend::Local(service))
            }
            BackendKind::Remote => {
                let base_url = settings.effective_base_url();
                tracing::info!(%base_url, "Using remote bookmark service");
                let service = HttpBookmarkService::new(
                    &base_url,
                    Duration::from_secs(settings.request_timeout_secs),
                )?;
                Ok(Backend::Remote(service))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Local(_) => BackendKind::Local,
            Backend::Remote(_) => BackendKind::Remote,
        }
    }
}

impl BookmarkService for Backend {
    async fn list(&self, query: &ListQuery) -> Result<ListPage, StoreError> {
        match self {
            Backend::Local(s) => s.list(query).await,
            Backend::Remote(s) => s.list(query).await,
        }
    }

    async fn create(&self, record: &NewBookmark) -> Result<Bookmark, StoreError> {
        match self {
            Backend::Local(s) => s.create(record).await,
            Backend::Remote(s) => s.create(record).await,
        }
    }

    async fn update(&self, id: &str, record: &Bookmark) -> Result<Bookmark, StoreError> {
        match self {
            Backend::Local(s) => s.update(id, record).await,
            Backend::Remote(s) => s.update(id, record).await,
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        match self {
            Backend::Local(s) => s.delete(id).await,
            Backend::Remote(s) => s.delete(id).await,
        }
    }
}

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub store: CollectionStore<Backend>,
}

impl App {
    /// Loads settings from `settings_path` (or the platform default) and
    /// opens the configured backend.
    pub fn new(settings_path: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        settings_engine.load()?;
        Self::from_settings(settings_engine)
    }

    /// Opens the backend named by already-loaded settings.
    pub fn from_settings(settings_engine: SettingsEngine) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = settings_engine.get_settings().clone();
        let backend = Backend::from_settings(&settings.backend)?;
        let store = CollectionStore::new(backend, settings.pagination.page_size);

        Ok(Self {
            settings_engine,
            store,
        })
    }

    /// An app over an explicit backend, with default settings that are never
    /// written to disk unless changed.
    pub fn with_backend(settings_engine: SettingsEngine, backend: Backend) -> Self {
        let page_size = settings_engine.get_settings().pagination.page_size;
        Self {
            settings_engine,
            store: CollectionStore::new(backend, page_size),
        }
    }

    /// Loads the first page under an empty filter.
    pub async fn startup(&mut self) -> Result<(), StoreError> {
        self.store.refresh().await?;
        Ok(())
    }
}
