//! The [`SettingsStore`] and [`ContentStore`] traits defining the storage
//! contract for a site.
//!
//! Both traits are synchronous. Every write call touches exactly one logical
//! record (or one menu's item list) and backends serialize their own writes;
//! callers never coordinate across calls.
//!
//! All backends (InMemoryStore, SqliteStore) implement both traits, so they
//! are swappable without changing the operation handlers.

use serde_json::Value;

use crate::error::StorageError;
use crate::types::{
    Extension, Menu, MenuId, MenuItem, NewExtension, NewPage, Page, PageId, Term, TermId,
};

/// Key/value persistent configuration.
pub trait SettingsStore {
    /// Reads an option, returning `None` if it was never set.
    fn get_option(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Writes an option, replacing any previous value.
    fn set_option(&mut self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Reads an option, falling back to `default` when absent.
    fn get_option_or(&self, key: &str, default: Value) -> Result<Value, StorageError> {
        Ok(self.get_option(key)?.unwrap_or(default))
    }

    /// Reads a string option. Non-string values are treated as absent.
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .get_option(key)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }
}

/// Structured content: pages, taxonomy terms, navigation menus and the
/// extension inventory.
pub trait ContentStore {
    // -------------------------------------------------------------------
    // Pages
    // -------------------------------------------------------------------

    /// Looks a page up by ID.
    fn get_page(&self, id: PageId) -> Result<Option<Page>, StorageError>;

    /// Looks a page up by its slug.
    fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StorageError>;

    /// Inserts a page, returning its new ID.
    fn insert_page(&mut self, page: &NewPage) -> Result<PageId, StorageError>;

    /// Overwrites an existing page in place. The ID is preserved.
    fn update_page(&mut self, id: PageId, page: &NewPage) -> Result<(), StorageError>;

    /// Lists all pages ordered by ID.
    fn list_pages(&self) -> Result<Vec<Page>, StorageError>;

    // -------------------------------------------------------------------
    // Taxonomy terms
    // -------------------------------------------------------------------

    /// Looks a term up by taxonomy and slug.
    fn find_term(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>, StorageError>;

    /// Inserts a term, returning its new ID.
    fn insert_term(&mut self, taxonomy: &str, name: &str, slug: &str)
        -> Result<TermId, StorageError>;

    /// Lists all terms of a taxonomy ordered by ID.
    fn list_terms(&self, taxonomy: &str) -> Result<Vec<Term>, StorageError>;

    // -------------------------------------------------------------------
    // Navigation menus
    // -------------------------------------------------------------------

    /// Looks a menu up by name.
    fn find_menu(&self, name: &str) -> Result<Option<Menu>, StorageError>;

    /// Creates an empty menu, returning its new ID.
    fn create_menu(&mut self, name: &str) -> Result<MenuId, StorageError>;

    /// Deletes every item of a menu, returning how many were removed.
    fn clear_menu_items(&mut self, menu: MenuId) -> Result<usize, StorageError>;

    /// Appends an item to a menu at the given position.
    fn insert_menu_item(
        &mut self,
        menu: MenuId,
        title: &str,
        url: &str,
        position: u32,
    ) -> Result<(), StorageError>;

    /// Lists the items of a menu ordered by position.
    fn list_menu_items(&self, menu: MenuId) -> Result<Vec<MenuItem>, StorageError>;

    // -------------------------------------------------------------------
    // Extensions
    // -------------------------------------------------------------------

    /// Lists the installed extensions ordered by slug.
    fn list_extensions(&self) -> Result<Vec<Extension>, StorageError>;

    /// Looks an installed extension up by slug.
    fn get_extension(&self, slug: &str) -> Result<Option<Extension>, StorageError>;

    /// Records an installed extension along with its package archive.
    /// Newly installed extensions are inactive.
    fn install_extension(
        &mut self,
        extension: &NewExtension,
        archive: &[u8],
    ) -> Result<(), StorageError>;

    /// Marks an installed extension active or inactive.
    fn set_extension_active(&mut self, slug: &str, active: bool) -> Result<(), StorageError>;
}

/// A backend offering both store contracts, shareable across tasks.
pub trait SiteStore: SettingsStore + ContentStore + Send {}

impl<T: SettingsStore + ContentStore + Send> SiteStore for T {}
