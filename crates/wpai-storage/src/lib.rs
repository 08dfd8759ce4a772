//! Storage abstraction for the site being configured.
//!
//! Provides the [`SettingsStore`] and [`ContentStore`] traits defining the
//! contract every backend implements, plus [`InMemoryStore`] and
//! [`SqliteStore`] as first-class backends.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: record and identifier types (pages, terms, menus, extensions)
//! - [`traits`]: SettingsStore / ContentStore trait definitions
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL schema migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{ContentStore, SettingsStore, SiteStore};
pub use types::{
    Extension, Menu, MenuId, MenuItem, MenuItemId, NewExtension, NewPage, Page, PageId, Term,
    TermId,
};
