//! Storage-layer record types and identifiers.
//!
//! Identifiers wrap `i64` to line up with SQLite's `INTEGER PRIMARY KEY`.
//! Records only gain an ID once they are persisted, so the `New*` structs
//! carry everything except the identity.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a stored page.
    PageId
);
record_id!(
    /// Identifier of a taxonomy term.
    TermId
);
record_id!(
    /// Identifier of a navigation menu.
    MenuId
);
record_id!(
    /// Identifier of a single navigation menu entry.
    MenuItemId
);

/// A stored page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// Stable natural key used for create-or-update lookups.
    pub slug: String,
    pub content: String,
    pub status: String,
}

/// Page fields supplied when creating or updating a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub status: String,
}

/// A taxonomy term (categories live in the `category` taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub slug: String,
    pub taxonomy: String,
}

/// A named navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
    pub name: String,
}

/// One entry of a navigation menu. `position` is 1-based and authoritative
/// for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub menu_id: MenuId,
    pub title: String,
    pub url: String,
    pub position: u32,
}

/// An installed extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub slug: String,
    pub name: String,
    pub version: String,
    pub active: bool,
    /// blake3 hex digest of the installed package archive.
    pub checksum: String,
}

/// Extension metadata recorded at install time, together with the package
/// archive passed to [`ContentStore::install_extension`].
///
/// [`ContentStore::install_extension`]: crate::traits::ContentStore::install_extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExtension {
    pub slug: String,
    pub name: String,
    pub version: String,
    pub checksum: String,
}
