//! In-memory implementation of [`SettingsStore`] and [`ContentStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, dry runs and
//! anywhere persistence isn't needed. It keeps everything in ordered maps
//! with the same semantics as the SQLite backend, including ID allocation
//! starting at 1.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StorageError;
use crate::traits::{ContentStore, SettingsStore};
use crate::types::{
    Extension, Menu, MenuId, MenuItem, MenuItemId, NewExtension, NewPage, Page, PageId, Term,
    TermId,
};

/// An installed extension together with its archive.
#[derive(Debug, Clone)]
struct StoredExtension {
    record: Extension,
    archive: Vec<u8>,
}

/// In-memory store backed by ordered maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    options: BTreeMap<String, Value>,
    pages: BTreeMap<PageId, Page>,
    terms: BTreeMap<TermId, Term>,
    menus: BTreeMap<MenuId, Menu>,
    menu_items: BTreeMap<MenuItemId, MenuItem>,
    extensions: BTreeMap<String, StoredExtension>,
    /// Last allocated ID, shared by every record kind.
    last_id: i64,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Returns the stored archive of an installed extension.
    pub fn extension_archive(&self, slug: &str) -> Option<&[u8]> {
        self.extensions.get(slug).map(|e| e.archive.as_slice())
    }
}

impl SettingsStore for InMemoryStore {
    fn get_option(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.options.get(key).cloned())
    }

    fn set_option(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.options.insert(key.to_string(), value);
        Ok(())
    }
}

impl ContentStore for InMemoryStore {
    fn get_page(&self, id: PageId) -> Result<Option<Page>, StorageError> {
        Ok(self.pages.get(&id).cloned())
    }

    fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StorageError> {
        Ok(self.pages.values().find(|p| p.slug == slug).cloned())
    }

    fn insert_page(&mut self, page: &NewPage) -> Result<PageId, StorageError> {
        if self.pages.values().any(|p| p.slug == page.slug) {
            return Err(StorageError::IntegrityError {
                reason: format!("duplicate page slug '{}'", page.slug),
            });
        }
        let id = PageId(self.next_id());
        self.pages.insert(
            id,
            Page {
                id,
                title: page.title.clone(),
                slug: page.slug.clone(),
                content: page.content.clone(),
                status: page.status.clone(),
            },
        );
        Ok(id)
    }

    fn update_page(&mut self, id: PageId, page: &NewPage) -> Result<(), StorageError> {
        let stored = self
            .pages
            .get_mut(&id)
            .ok_or(StorageError::PageNotFound(id.0))?;
        stored.title = page.title.clone();
        stored.slug = page.slug.clone();
        stored.content = page.content.clone();
        stored.status = page.status.clone();
        Ok(())
    }

    fn list_pages(&self) -> Result<Vec<Page>, StorageError> {
        Ok(self.pages.values().cloned().collect())
    }

    fn find_term(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>, StorageError> {
        Ok(self
            .terms
            .values()
            .find(|t| t.taxonomy == taxonomy && t.slug == slug)
            .cloned())
    }

    fn insert_term(
        &mut self,
        taxonomy: &str,
        name: &str,
        slug: &str,
    ) -> Result<TermId, StorageError> {
        if self.find_term(taxonomy, slug)?.is_some() {
            return Err(StorageError::IntegrityError {
                reason: format!("duplicate {} slug '{}'", taxonomy, slug),
            });
        }
        let id = TermId(self.next_id());
        self.terms.insert(
            id,
            Term {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
                taxonomy: taxonomy.to_string(),
            },
        );
        Ok(id)
    }

    fn list_terms(&self, taxonomy: &str) -> Result<Vec<Term>, StorageError> {
        Ok(self
            .terms
            .values()
            .filter(|t| t.taxonomy == taxonomy)
            .cloned()
            .collect())
    }

    fn find_menu(&self, name: &str) -> Result<Option<Menu>, StorageError> {
        Ok(self.menus.values().find(|m| m.name == name).cloned())
    }

    fn create_menu(&mut self, name: &str) -> Result<MenuId, StorageError> {
        let id = MenuId(self.next_id());
        self.menus.insert(
            id,
            Menu {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    fn clear_menu_items(&mut self, menu: MenuId) -> Result<usize, StorageError> {
        if !self.menus.contains_key(&menu) {
            return Err(StorageError::MenuNotFound(menu.0));
        }
        let before = self.menu_items.len();
        self.menu_items.retain(|_, item| item.menu_id != menu);
        Ok(before - self.menu_items.len())
    }

    fn insert_menu_item(
        &mut self,
        menu: MenuId,
        title: &str,
        url: &str,
        position: u32,
    ) -> Result<(), StorageError> {
        if !self.menus.contains_key(&menu) {
            return Err(StorageError::MenuNotFound(menu.0));
        }
        let id = MenuItemId(self.next_id());
        self.menu_items.insert(
            id,
            MenuItem {
                id,
                menu_id: menu,
                title: title.to_string(),
                url: url.to_string(),
                position,
            },
        );
        Ok(())
    }

    fn list_menu_items(&self, menu: MenuId) -> Result<Vec<MenuItem>, StorageError> {
        let mut items: Vec<MenuItem> = self
            .menu_items
            .values()
            .filter(|item| item.menu_id == menu)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.position, item.id));
        Ok(items)
    }

    fn list_extensions(&self) -> Result<Vec<Extension>, StorageError> {
        Ok(self.extensions.values().map(|e| e.record.clone()).collect())
    }

    fn get_extension(&self, slug: &str) -> Result<Option<Extension>, StorageError> {
        Ok(self.extensions.get(slug).map(|e| e.record.clone()))
    }

    fn install_extension(
        &mut self,
        extension: &NewExtension,
        archive: &[u8],
    ) -> Result<(), StorageError> {
        self.extensions.insert(
            extension.slug.clone(),
            StoredExtension {
                record: Extension {
                    slug: extension.slug.clone(),
                    name: extension.name.clone(),
                    version: extension.version.clone(),
                    active: false,
                    checksum: extension.checksum.clone(),
                },
                archive: archive.to_vec(),
            },
        );
        Ok(())
    }

    fn set_extension_active(&mut self, slug: &str, active: bool) -> Result<(), StorageError> {
        let stored = self
            .extensions
            .get_mut(slug)
            .ok_or_else(|| StorageError::ExtensionNotFound(slug.to_string()))?;
        stored.record.active = active;
        Ok(())
    }
}
