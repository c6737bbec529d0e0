use serde::{Deserialize, Serialize};

use super::pagination::DEFAULT_PAGE_SIZE;

/// Base URL used when neither settings nor `LINKDECK_API_URL` name one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Environment variable overriding `backend.remote_base_url`.
pub const API_URL_ENV: &str = "LINKDECK_API_URL";

/// Top-level settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    pub pagination: PaginationSettings,
    pub backend: BackendSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationSettings {
    pub page_size: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Which bookmark service the store talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// SQLite file on this machine.
    Local,
    /// HTTP bookmark API.
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub remote_base_url: String,
    pub request_timeout_secs: u64,
    pub local_db_path: Option<String>,
    pub simulated_latency_ms: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            remote_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            local_db_path: None,
            simulated_latency_ms: 0,
        }
    }
}

impl BackendSettings {
    /// Remote base URL with the environment override applied.
    pub fn effective_base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.remote_base_url.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"linkdeck=debug"`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
