//! Taxonomy, page, menu and homepage request/response types.

use serde::{Deserialize, Serialize};

use wpai_storage::{MenuId, PageId, TermId};

/// Request for `POST /categories`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesRequest {
    pub categories: Option<Vec<CategoryInput>>,
}

/// One category to create. Entries without a name are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// A category created by a request.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedTerm {
    pub id: TermId,
    pub name: String,
    pub slug: String,
}

/// Response for `POST /categories`.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    /// Only the categories that did not exist before.
    pub created: Vec<CreatedTerm>,
}

/// Request for `POST /pages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

/// Whether a create-or-update call created or updated its resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Response for `POST /pages`.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    pub success: bool,
    pub page_id: PageId,
    pub action: UpsertAction,
}

/// Request for `POST /menus`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuRequest {
    pub name: Option<String>,
    /// Theme location to assign the menu to.
    pub location: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItemInput>,
}

/// One menu entry, in display order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemInput {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// Response for `POST /menus`.
#[derive(Debug, Clone, Serialize)]
pub struct MenuResponse {
    pub success: bool,
    pub menu_id: MenuId,
    /// Number of items now in the menu.
    pub items: usize,
}

/// Request for `POST /set-homepage`. `page_id` wins over `slug`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomepageRequest {
    pub page_id: Option<i64>,
    pub slug: Option<String>,
}

/// Response for `POST /set-homepage`.
#[derive(Debug, Clone, Serialize)]
pub struct HomepageResponse {
    pub success: bool,
    pub page_id: PageId,
}
