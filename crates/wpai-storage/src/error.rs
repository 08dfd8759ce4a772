//! Storage error types for wpai-storage.
//!
//! [`StorageError`] covers the failure modes of both backends: database and
//! migration failures, option (de)serialization, missing records and
//! integrity violations.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// JSON serialization or deserialization of an option value failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A page with the given ID was not found.
    #[error("page not found: {0}")]
    PageNotFound(i64),

    /// A menu with the given ID was not found.
    #[error("menu not found: {0}")]
    MenuNotFound(i64),

    /// No installed extension has the given slug.
    #[error("extension not installed: {0}")]
    ExtensionNotFound(String),

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
