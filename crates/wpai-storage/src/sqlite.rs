//! SQLite implementation of [`SettingsStore`] and [`ContentStore`].
//!
//! [`SqliteStore`] persists the site in a SQLite database with WAL mode and
//! automatic schema migrations. Option values are stored as JSON TEXT.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::error::StorageError;
use crate::traits::{ContentStore, SettingsStore};
use crate::types::{
    Extension, Menu, MenuId, MenuItem, MenuItemId, NewExtension, NewPage, Page, PageId, Term,
    TermId,
};

/// SQLite-backed site store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Row mappers
    // -----------------------------------------------------------------------

    fn page_from_row(row: &Row<'_>) -> rusqlite::Result<Page> {
        Ok(Page {
            id: PageId(row.get(0)?),
            title: row.get(1)?,
            slug: row.get(2)?,
            content: row.get(3)?,
            status: row.get(4)?,
        })
    }

    fn term_from_row(row: &Row<'_>) -> rusqlite::Result<Term> {
        Ok(Term {
            id: TermId(row.get(0)?),
            taxonomy: row.get(1)?,
            name: row.get(2)?,
            slug: row.get(3)?,
        })
    }

    fn extension_from_row(row: &Row<'_>) -> rusqlite::Result<Extension> {
        Ok(Extension {
            slug: row.get(0)?,
            name: row.get(1)?,
            version: row.get(2)?,
            active: row.get::<_, i64>(3)? != 0,
            checksum: row.get(4)?,
        })
    }

    fn menu_exists(&self, menu: MenuId) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM menus WHERE id = ?1)",
            params![menu.0],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl SettingsStore for SqliteStore {
    fn get_option(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value_json FROM options WHERE name = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set_option(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        let json = serde_json::to_string(&value)?;
        self.conn.execute(
            "INSERT INTO options (name, value_json) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value_json = excluded.value_json",
            params![key, json],
        )?;
        Ok(())
    }
}

impl ContentStore for SqliteStore {
    fn get_page(&self, id: PageId) -> Result<Option<Page>, StorageError> {
        let page = self
            .conn
            .query_row(
                "SELECT id, title, slug, content, status FROM pages WHERE id = ?1",
                params![id.0],
                Self::page_from_row,
            )
            .optional()?;
        Ok(page)
    }

    fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StorageError> {
        let page = self
            .conn
            .query_row(
                "SELECT id, title, slug, content, status FROM pages WHERE slug = ?1",
                params![slug],
                Self::page_from_row,
            )
            .optional()?;
        Ok(page)
    }

    fn insert_page(&mut self, page: &NewPage) -> Result<PageId, StorageError> {
        self.conn.execute(
            "INSERT INTO pages (title, slug, content, status) VALUES (?1, ?2, ?3, ?4)",
            params![page.title, page.slug, page.content, page.status],
        )?;
        Ok(PageId(self.conn.last_insert_rowid()))
    }

    fn update_page(&mut self, id: PageId, page: &NewPage) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE pages SET title = ?1, slug = ?2, content = ?3, status = ?4 WHERE id = ?5",
            params![page.title, page.slug, page.content, page.status, id.0],
        )?;
        if changed == 0 {
            return Err(StorageError::PageNotFound(id.0));
        }
        Ok(())
    }

    fn list_pages(&self) -> Result<Vec<Page>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, slug, content, status FROM pages ORDER BY id")?;
        let pages = stmt
            .query_map([], Self::page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages)
    }

    fn find_term(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>, StorageError> {
        let term = self
            .conn
            .query_row(
                "SELECT id, taxonomy, name, slug FROM terms WHERE taxonomy = ?1 AND slug = ?2",
                params![taxonomy, slug],
                Self::term_from_row,
            )
            .optional()?;
        Ok(term)
    }

    fn insert_term(
        &mut self,
        taxonomy: &str,
        name: &str,
        slug: &str,
    ) -> Result<TermId, StorageError> {
        self.conn.execute(
            "INSERT INTO terms (taxonomy, name, slug) VALUES (?1, ?2, ?3)",
            params![taxonomy, name, slug],
        )?;
        Ok(TermId(self.conn.last_insert_rowid()))
    }

    fn list_terms(&self, taxonomy: &str) -> Result<Vec<Term>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, taxonomy, name, slug FROM terms WHERE taxonomy = ?1 ORDER BY id",
        )?;
        let terms = stmt
            .query_map(params![taxonomy], Self::term_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(terms)
    }

    fn find_menu(&self, name: &str) -> Result<Option<Menu>, StorageError> {
        let menu = self
            .conn
            .query_row(
                "SELECT id, name FROM menus WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Menu {
                        id: MenuId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(menu)
    }

    fn create_menu(&mut self, name: &str) -> Result<MenuId, StorageError> {
        self.conn
            .execute("INSERT INTO menus (name) VALUES (?1)", params![name])?;
        Ok(MenuId(self.conn.last_insert_rowid()))
    }

    fn clear_menu_items(&mut self, menu: MenuId) -> Result<usize, StorageError> {
        if !self.menu_exists(menu)? {
            return Err(StorageError::MenuNotFound(menu.0));
        }
        let removed = self
            .conn
            .execute("DELETE FROM menu_items WHERE menu_id = ?1", params![menu.0])?;
        Ok(removed)
    }

    fn insert_menu_item(
        &mut self,
        menu: MenuId,
        title: &str,
        url: &str,
        position: u32,
    ) -> Result<(), StorageError> {
        if !self.menu_exists(menu)? {
            return Err(StorageError::MenuNotFound(menu.0));
        }
        self.conn.execute(
            "INSERT INTO menu_items (menu_id, title, url, position) VALUES (?1, ?2, ?3, ?4)",
            params![menu.0, title, url, position],
        )?;
        Ok(())
    }

    fn list_menu_items(&self, menu: MenuId) -> Result<Vec<MenuItem>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, menu_id, title, url, position FROM menu_items
             WHERE menu_id = ?1 ORDER BY position, id",
        )?;
        let items = stmt
            .query_map(params![menu.0], |row| {
                Ok(MenuItem {
                    id: MenuItemId(row.get(0)?),
                    menu_id: MenuId(row.get(1)?),
                    title: row.get(2)?,
                    url: row.get(3)?,
                    position: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn list_extensions(&self) -> Result<Vec<Extension>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT slug, name, version, active, checksum FROM extensions ORDER BY slug",
        )?;
        let extensions = stmt
            .query_map([], Self::extension_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(extensions)
    }

    fn get_extension(&self, slug: &str) -> Result<Option<Extension>, StorageError> {
        let extension = self
            .conn
            .query_row(
                "SELECT slug, name, version, active, checksum FROM extensions WHERE slug = ?1",
                params![slug],
                Self::extension_from_row,
            )
            .optional()?;
        Ok(extension)
    }

    fn install_extension(
        &mut self,
        extension: &NewExtension,
        archive: &[u8],
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO extensions (slug, name, version, active, checksum, archive)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)
             ON CONFLICT(slug) DO UPDATE SET
                 name = excluded.name,
                 version = excluded.version,
                 checksum = excluded.checksum,
                 archive = excluded.archive",
            params![
                extension.slug,
                extension.name,
                extension.version,
                extension.checksum,
                archive,
            ],
        )?;
        Ok(())
    }

    fn set_extension_active(&mut self, slug: &str, active: bool) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE extensions SET active = ?1 WHERE slug = ?2",
            params![active as i64, slug],
        )?;
        if changed == 0 {
            return Err(StorageError::ExtensionNotFound(slug.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(title: &str, slug: &str) -> NewPage {
        NewPage {
            title: title.into(),
            slug: slug.into(),
            content: "<p>hello</p>".into(),
            status: "publish".into(),
        }
    }

    #[test]
    fn options_round_trip_arbitrary_json() {
        let mut store = SqliteStore::in_memory().unwrap();
        assert!(store.get_option("nav_menu_locations").unwrap().is_none());

        store
            .set_option("nav_menu_locations", json!({ "primary": 3 }))
            .unwrap();
        store
            .set_option("nav_menu_locations", json!({ "primary": 4 }))
            .unwrap();
        assert_eq!(
            store.get_option("nav_menu_locations").unwrap(),
            Some(json!({ "primary": 4 }))
        );
    }

    #[test]
    fn page_lookup_by_slug_and_update_in_place() {
        let mut store = SqliteStore::in_memory().unwrap();
        let id = store.insert_page(&page("Contact", "contact")).unwrap();

        let found = store.find_page_by_slug("contact").unwrap().unwrap();
        assert_eq!(found.id, id);

        store.update_page(id, &page("Contact us", "contact")).unwrap();
        let pages = store.list_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Contact us");

        let err = store.update_page(PageId(999), &page("x", "x")).unwrap_err();
        assert!(matches!(err, StorageError::PageNotFound(999)));
    }

    #[test]
    fn terms_are_scoped_by_taxonomy() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.insert_term("category", "Wicca", "wicca").unwrap();
        store.insert_term("post_tag", "Wicca", "wicca").unwrap();

        assert!(store.find_term("category", "wicca").unwrap().is_some());
        assert_eq!(store.list_terms("category").unwrap().len(), 1);
        assert!(store.insert_term("category", "Wicca", "wicca").is_err());
    }

    #[test]
    fn clearing_menu_items_replaces_contents() {
        let mut store = SqliteStore::in_memory().unwrap();
        let menu = store.create_menu("Main").unwrap();
        store.insert_menu_item(menu, "A", "/a", 1).unwrap();
        store.insert_menu_item(menu, "B", "/b", 2).unwrap();

        assert_eq!(store.clear_menu_items(menu).unwrap(), 2);
        store.insert_menu_item(menu, "C", "/c", 1).unwrap();

        let items = store.list_menu_items(menu).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "C");
        assert_eq!(items[0].menu_id, menu);
    }

    #[test]
    fn menu_items_require_existing_menu() {
        let mut store = SqliteStore::in_memory().unwrap();
        let err = store
            .insert_menu_item(MenuId(42), "A", "/a", 1)
            .unwrap_err();
        assert!(matches!(err, StorageError::MenuNotFound(42)));
    }

    #[test]
    fn reinstalling_extension_keeps_activation_state() {
        let mut store = SqliteStore::in_memory().unwrap();
        let mut ext = NewExtension {
            slug: "contact-form-7".into(),
            name: "Contact Form 7".into(),
            version: "5.9".into(),
            checksum: "aa".into(),
        };
        store.install_extension(&ext, b"v1").unwrap();
        store.set_extension_active("contact-form-7", true).unwrap();

        ext.version = "6.0".into();
        store.install_extension(&ext, b"v2").unwrap();

        let stored = store.get_extension("contact-form-7").unwrap().unwrap();
        assert!(stored.active);
        assert_eq!(stored.version, "6.0");
        assert_eq!(store.list_extensions().unwrap().len(), 1);
    }
}
