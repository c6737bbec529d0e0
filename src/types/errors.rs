use std::fmt;

// === StoreError ===

/// Failures surfaced by the bookmark service and the collection store.
///
/// Every store operation that fails leaves local state as it was before
/// the attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The service was unreachable or answered with a non-success status.
    NetworkFailure(String),
    /// The draft or patch was malformed (e.g. missing title, bad url).
    ValidationFailure(String),
    /// The target id does not exist.
    NotFound(String),
}

impl StoreError {
    /// Transient failures are worth re-triggering from the UI.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::NetworkFailure(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NetworkFailure(msg) => write!(f, "Bookmark service unavailable: {}", msg),
            StoreError::ValidationFailure(msg) => write!(f, "Invalid bookmark data: {}", msg),
            StoreError::NotFound(id) => write!(f, "Not found: {}", id),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::NetworkFailure(format!("local database: {}", e))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::NetworkFailure(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
