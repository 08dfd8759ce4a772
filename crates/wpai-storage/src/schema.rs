//! Connection setup for the SQLite backend.
//!
//! The schema lives in `migrations/` and is compiled into the binary. The
//! applied version is tracked in the database's `user_version`.

use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

use crate::error::StorageError;

const PRAGMAS: [(&str, &str); 3] = [
    // Ignored by in-memory databases.
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    // Menu items are removed with their menu.
    ("foreign_keys", "ON"),
];

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(include_str!(
        "migrations/001_initial_schema.sql"
    ))])
}

/// Opens the site database file at `path`, creating it when missing, and
/// brings its schema up to date.
pub fn open_database(path: &str) -> Result<Connection, StorageError> {
    prepare(Connection::open(path)?)
}

/// A fresh database that lives only as long as the connection.
pub fn open_in_memory() -> Result<Connection, StorageError> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(mut conn: Connection) -> Result<Connection, StorageError> {
    for (name, value) in PRAGMAS {
        conn.pragma_update(None, name, value)?;
    }
    migrations()
        .to_latest(&mut conn)
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_schema_validates() {
        assert!(migrations().validate().is_ok());
    }

    #[test]
    fn site_tables_exist_after_open() {
        let conn = open_in_memory().unwrap();
        for table in ["options", "pages", "terms", "menus", "menu_items", "extensions"] {
            let exists: bool = conn
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert!(exists, "missing table {}", table);
        }
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = open_in_memory().unwrap();
        let on: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(on, 1);
    }
}
