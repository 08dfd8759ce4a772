//! HTTP/JSON API that lets an automated caller configure a content site.
//!
//! Provides token-guarded endpoints for site settings, categories, pages,
//! menus, the front page, SEO defaults, options and extensions, plus a
//! blueprint runner that chains them. At startup every operation is also
//! offered as a named capability to an optional registry (see [`bridge`]).

pub mod auth;
pub mod blueprint;
pub mod bridge;
pub mod config;
pub mod error;
pub mod handlers;
pub mod packages;
pub mod router;
pub mod schema;
pub mod service;
pub mod slug;
pub mod state;
