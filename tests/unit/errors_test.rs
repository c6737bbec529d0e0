use linkdeck::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::NetworkFailure("connection refused".to_string()).to_string(),
        "Bookmark service unavailable: connection refused"
    );
    assert_eq!(
        StoreError::ValidationFailure("title is required".to_string()).to_string(),
        "Invalid bookmark data: title is required"
    );
    assert_eq!(
        StoreError::NotFound("bookmark-3".to_string()).to_string(),
        "Not found: bookmark-3"
    );
}

#[test]
fn store_error_only_network_failures_are_transient() {
    assert!(StoreError::NetworkFailure("timeout".to_string()).is_transient());
    assert!(!StoreError::ValidationFailure("bad url".to_string()).is_transient());
    assert!(!StoreError::NotFound("x".to_string()).is_transient());
}

#[test]
fn store_error_from_rusqlite_is_network_failure() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StoreError::NetworkFailure(ref msg) if msg.starts_with("local database")));
}

#[test]
fn store_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(StoreError::NotFound("id".to_string()));
    assert!(err.source().is_none());
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("disk full".to_string()).to_string(),
        "Settings I/O error: disk full"
    );
    assert_eq!(
        SettingsError::SerializationError("unexpected EOF".to_string()).to_string(),
        "Settings serialization error: unexpected EOF"
    );
    assert_eq!(
        SettingsError::InvalidKey("pagination.nope".to_string()).to_string(),
        "Invalid settings key: pagination.nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("page_size".to_string()).to_string(),
        "Invalid settings value: page_size"
    );
}

#[test]
fn settings_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(SettingsError::InvalidKey("k".to_string()));
    assert!(err.source().is_none());
}
