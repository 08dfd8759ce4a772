//! SiteService: the single coordinator between HTTP handlers and the site
//! store.
//!
//! Every operation validates its request completely before the first store
//! call, so a rejected request never leaves a partial write behind. Handlers
//! are thin wrappers that delegate to these methods; the blueprint runner and
//! registry callbacks call them in-process.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use wpai_storage::{NewExtension, NewPage, PageId, SiteStore};

use crate::error::ApiError;
use crate::packages::PackageSource;
use crate::schema::common::MessageResponse;
use crate::schema::content::{
    CategoriesRequest, CategoriesResponse, CreatedTerm, HomepageRequest, HomepageResponse,
    MenuRequest, MenuResponse, PageRequest, PageResponse, UpsertAction,
};
use crate::schema::options::SetOptionRequest;
use crate::schema::plugins::{InstallPluginRequest, InstallPluginResponse, PluginView};
use crate::schema::site::{BasicSetupRequest, SiteInfoResponse};
use crate::slug::slug_or_title;

/// Option keys written by the handlers.
pub mod options {
    pub const BLOG_NAME: &str = "blogname";
    pub const BLOG_DESCRIPTION: &str = "blogdescription";
    pub const SITE_URL: &str = "siteurl";
    pub const TIMEZONE: &str = "timezone_string";
    pub const PERMALINK_STRUCTURE: &str = "permalink_structure";
    pub const SHOW_ON_FRONT: &str = "show_on_front";
    pub const PAGE_ON_FRONT: &str = "page_on_front";
    pub const MENU_LOCATIONS: &str = "nav_menu_locations";
}

pub const DEFAULT_PERMALINK: &str = "/%postname%/";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_PAGE_STATUS: &str = "publish";
const PAGE_STATUSES: &[&str] = &["publish", "draft", "pending", "private"];

const CATEGORY_TAXONOMY: &str = "category";

/// Slug of the SEO extension configured by [`SiteService::setup_seo`].
pub const SEO_EXTENSION: &str = "seo-by-rank-math";

/// Returns the trimmed value of a required string field.
fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// Returns a trimmed optional string, treating blank as absent.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The central service owning the site store and package source.
pub struct SiteService {
    store: Box<dyn SiteStore>,
    packages: Arc<dyn PackageSource>,
    site_url: String,
}

impl SiteService {
    pub fn new(store: Box<dyn SiteStore>, packages: Arc<dyn PackageSource>) -> Self {
        SiteService {
            store,
            packages,
            site_url: "http://localhost".to_string(),
        }
    }

    /// Sets the URL reported by `site_info` when no `siteurl` option exists.
    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    pub fn store(&self) -> &dyn SiteStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn SiteStore {
        self.store.as_mut()
    }

    // -----------------------------------------------------------------------
    // Site settings
    // -----------------------------------------------------------------------

    /// Site metadata plus the extension inventory.
    pub fn site_info(&self) -> Result<SiteInfoResponse, ApiError> {
        let string_or = |key: &str, default: &str| -> Result<String, ApiError> {
            Ok(self
                .store
                .get_string(key)?
                .unwrap_or_else(|| default.to_string()))
        };

        Ok(SiteInfoResponse {
            name: string_or(options::BLOG_NAME, "")?,
            description: string_or(options::BLOG_DESCRIPTION, "")?,
            url: string_or(options::SITE_URL, &self.site_url)?,
            timezone: string_or(options::TIMEZONE, DEFAULT_TIMEZONE)?,
            permalink_structure: string_or(options::PERMALINK_STRUCTURE, "")?,
            show_on_front: string_or(options::SHOW_ON_FRONT, "posts")?,
            page_on_front: self
                .store
                .get_option(options::PAGE_ON_FRONT)?
                .and_then(|v| v.as_i64()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            plugins: self.list_plugins()?,
        })
    }

    /// Permalink structure, timezone, title and tagline.
    pub fn basic_setup(&mut self, req: BasicSetupRequest) -> Result<MessageResponse, ApiError> {
        let permalink =
            optional(req.permalink).unwrap_or_else(|| DEFAULT_PERMALINK.to_string());
        let timezone = optional(req.timezone).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

        self.store
            .set_option(options::PERMALINK_STRUCTURE, Value::String(permalink))?;
        self.store
            .set_option(options::TIMEZONE, Value::String(timezone))?;
        if let Some(title) = optional(req.title) {
            self.store.set_option(options::BLOG_NAME, Value::String(title))?;
        }
        if let Some(description) = req.description {
            self.store
                .set_option(options::BLOG_DESCRIPTION, Value::String(description))?;
        }

        tracing::info!("basic settings updated");
        Ok(MessageResponse::ok("Basic settings updated"))
    }

    /// Writes one arbitrary option.
    pub fn set_option(&mut self, req: SetOptionRequest) -> Result<MessageResponse, ApiError> {
        let name = required(req.option_name, "option_name")?;
        self.store.set_option(&name, req.option_value)?;
        tracing::info!(option = %name, "option updated");
        Ok(MessageResponse::ok(format!("Option {} updated", name)))
    }

    // -----------------------------------------------------------------------
    // Content
    // -----------------------------------------------------------------------

    /// Creates every category that does not exist yet. Existing categories
    /// (matched by slug) are left untouched and not reported.
    pub fn create_categories(
        &mut self,
        req: CategoriesRequest,
    ) -> Result<CategoriesResponse, ApiError> {
        let entries = req
            .categories
            .ok_or(ApiError::MissingField("categories"))?;

        let mut created = Vec::new();
        for entry in entries {
            let Some(name) = optional(entry.name) else {
                continue;
            };
            let slug = slug_or_title(entry.slug.as_deref(), &name);
            if self.store.find_term(CATEGORY_TAXONOMY, &slug)?.is_some() {
                continue;
            }
            let id = self.store.insert_term(CATEGORY_TAXONOMY, &name, &slug)?;
            created.push(CreatedTerm { id, name, slug });
        }

        tracing::info!(created = created.len(), "categories processed");
        Ok(CategoriesResponse {
            success: true,
            created,
        })
    }

    /// Creates a page, or updates the page that already has its slug.
    pub fn create_page(&mut self, req: PageRequest) -> Result<PageResponse, ApiError> {
        let title = required(req.title, "title")?;
        let slug = slug_or_title(req.slug.as_deref(), &title);
        let status = optional(req.status).unwrap_or_else(|| DEFAULT_PAGE_STATUS.to_string());
        if !PAGE_STATUSES.contains(&status.as_str()) {
            return Err(ApiError::Validation(format!(
                "invalid page status '{}': expected one of {}",
                status,
                PAGE_STATUSES.join(", ")
            )));
        }

        let page = NewPage {
            title,
            slug,
            content: req.content.unwrap_or_default(),
            status,
        };

        let (page_id, action) = match self.store.find_page_by_slug(&page.slug)? {
            Some(existing) => {
                self.store.update_page(existing.id, &page)?;
                (existing.id, UpsertAction::Updated)
            }
            None => (self.store.insert_page(&page)?, UpsertAction::Created),
        };

        tracing::info!(page_id = page_id.0, slug = %page.slug, ?action, "page saved");
        Ok(PageResponse {
            success: true,
            page_id,
            action,
        })
    }

    /// Creates or rebuilds a navigation menu. The supplied item list fully
    /// replaces whatever the menu held before.
    pub fn create_menu(&mut self, req: MenuRequest) -> Result<MenuResponse, ApiError> {
        let name = required(req.name, "name")?;
        let items: Vec<(String, String)> = req
            .items
            .into_iter()
            .filter_map(|item| Some((optional(item.title)?, optional(item.url)?)))
            .collect();
        let location = optional(req.location);

        let menu_id = match self.store.find_menu(&name)? {
            Some(menu) => menu.id,
            None => self.store.create_menu(&name)?,
        };

        let removed = self.store.clear_menu_items(menu_id)?;
        for (position, (title, url)) in items.iter().enumerate() {
            self.store
                .insert_menu_item(menu_id, title, url, position as u32 + 1)?;
        }

        if let Some(location) = location {
            let mut locations = match self.store.get_option(options::MENU_LOCATIONS)? {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            locations.insert(location, json!(menu_id.0));
            self.store
                .set_option(options::MENU_LOCATIONS, Value::Object(locations))?;
        }

        tracing::info!(menu_id = menu_id.0, removed, inserted = items.len(), "menu rebuilt");
        Ok(MenuResponse {
            success: true,
            menu_id,
            items: items.len(),
        })
    }

    /// Makes a static page the front page, resolving it by ID or slug.
    pub fn set_homepage(&mut self, req: HomepageRequest) -> Result<HomepageResponse, ApiError> {
        let slug = optional(req.slug);
        if req.page_id.is_none() && slug.is_none() {
            return Err(ApiError::MissingField("page_id"));
        }

        let mut page = match req.page_id {
            Some(id) => self.store.get_page(PageId(id))?,
            None => None,
        };
        if page.is_none() {
            if let Some(slug) = &slug {
                page = self.store.find_page_by_slug(slug)?;
            }
        }
        let page = page.ok_or_else(|| {
            ApiError::NotFound("no page matches the given page_id or slug".to_string())
        })?;

        self.store
            .set_option(options::SHOW_ON_FRONT, json!("page"))?;
        self.store
            .set_option(options::PAGE_ON_FRONT, json!(page.id.0))?;

        tracing::info!(page_id = page.id.0, "homepage set");
        Ok(HomepageResponse {
            success: true,
            page_id: page.id,
        })
    }

    // -----------------------------------------------------------------------
    // SEO
    // -----------------------------------------------------------------------

    /// Writes SEO defaults when the SEO extension is active. An inactive or
    /// missing extension is reported as `success: false`, not as an error.
    pub fn setup_seo(&mut self) -> Result<MessageResponse, ApiError> {
        let active = self
            .store
            .get_extension(SEO_EXTENSION)?
            .map(|ext| ext.active)
            .unwrap_or(false);
        if !active {
            return Ok(MessageResponse::unavailable("Rank Math is not active"));
        }

        for (key, defaults) in seo_defaults() {
            let mut merged = match self.store.get_option(key)? {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            if let Value::Object(defaults) = defaults {
                merged.extend(defaults);
            }
            self.store.set_option(key, Value::Object(merged))?;
        }

        tracing::info!("SEO defaults applied");
        Ok(MessageResponse::ok("Rank Math configured"))
    }

    // -----------------------------------------------------------------------
    // Extensions
    // -----------------------------------------------------------------------

    pub fn list_plugins(&self) -> Result<Vec<PluginView>, ApiError> {
        Ok(self
            .store
            .list_extensions()?
            .into_iter()
            .map(PluginView::from)
            .collect())
    }

    /// Resolve → download/install → activate.
    ///
    /// Failures while resolving or downloading abort with the directory's
    /// status. Activation is best-effort: a failure there is logged and the
    /// install still reports success.
    pub async fn install_plugin(
        &mut self,
        req: InstallPluginRequest,
    ) -> Result<InstallPluginResponse, ApiError> {
        let slug = required(req.slug, "slug")?;

        let info = self.packages.resolve(&slug).await?;

        if self.store.get_extension(&info.slug)?.is_none() {
            let archive = self.packages.download(&info).await?;
            let checksum = blake3::hash(&archive).to_hex().to_string();
            self.store.install_extension(
                &NewExtension {
                    slug: info.slug.clone(),
                    name: info.name.clone(),
                    version: info.version.clone(),
                    checksum,
                },
                &archive,
            )?;
            tracing::info!(slug = %info.slug, version = %info.version, "extension installed");
        }

        if let Err(err) = self.store.set_extension_active(&info.slug, true) {
            tracing::warn!(slug = %info.slug, error = %err, "extension activation failed");
        }

        let plugin = self
            .store
            .get_extension(&info.slug)?
            .map(PluginView::from)
            .ok_or_else(|| {
                ApiError::Internal(format!("extension '{}' missing after install", info.slug))
            })?;

        Ok(InstallPluginResponse {
            success: true,
            message: format!("{} installed", info.name),
            plugin,
        })
    }
}

/// SEO option groups and the defaults merged into each.
fn seo_defaults() -> [(&'static str, Value); 3] {
    [
        (
            "rank-math-options-general",
            json!({
                "breadcrumbs": "on",
                "strip_category_base": "on",
                "attachment_redirect_urls": "on",
            }),
        ),
        (
            "rank-math-options-titles",
            json!({
                "title_separator": "-",
                "homepage_title": "%sitename% %page% %sep% %sitedesc%",
                "pt_page_title": "%title% %page% %sep% %sitename%",
                "pt_post_title": "%title% %page% %sep% %sitename%",
                "noindex_empty_taxonomies": "on",
            }),
        ),
        (
            "rank-math-options-sitemap",
            json!({
                "items_per_page": 200,
                "include_images": "on",
                "pt_page_sitemap": "on",
                "pt_post_sitemap": "on",
                "tax_category_sitemap": "on",
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::{PackageError, PackageInfo};
    use crate::schema::content::{CategoryInput, MenuItemInput};
    use async_trait::async_trait;
    use wpai_storage::{
        ContentStore, Extension, InMemoryStore, Menu, MenuId, MenuItem, Page, SettingsStore,
        StorageError, Term, TermId,
    };

    struct NoPackages;

    #[async_trait]
    impl PackageSource for NoPackages {
        async fn resolve(&self, slug: &str) -> Result<PackageInfo, PackageError> {
            Err(PackageError::NotFound(slug.to_string()))
        }

        async fn download(&self, info: &PackageInfo) -> Result<Vec<u8>, PackageError> {
            Err(PackageError::NotFound(info.slug.clone()))
        }
    }

    fn service() -> SiteService {
        SiteService::new(Box::new(InMemoryStore::new()), Arc::new(NoPackages))
    }

    fn page(title: &str) -> PageRequest {
        PageRequest {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn basic_setup_applies_defaults() {
        let mut svc = service();
        svc.basic_setup(BasicSetupRequest {
            title: Some("Moon Circle".into()),
            ..Default::default()
        })
        .unwrap();

        let info = svc.site_info().unwrap();
        assert_eq!(info.name, "Moon Circle");
        assert_eq!(info.timezone, DEFAULT_TIMEZONE);
        assert_eq!(info.permalink_structure, DEFAULT_PERMALINK);
        assert_eq!(info.description, "");
    }

    #[test]
    fn page_without_title_is_rejected_before_any_write() {
        let mut svc = service();
        let err = svc.create_page(PageRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingField("title")));
        assert!(svc.store().list_pages().unwrap().is_empty());
    }

    #[test]
    fn page_upsert_keeps_id() {
        let mut svc = service();
        let first = svc.create_page(page("About Us")).unwrap();
        let second = svc
            .create_page(PageRequest {
                content: Some("<p>new</p>".into()),
                ..page("About Us")
            })
            .unwrap();

        assert_eq!(first.page_id, second.page_id);
        assert_eq!(first.action, UpsertAction::Created);
        assert_eq!(second.action, UpsertAction::Updated);
        let pages = svc.store().list_pages().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].slug, "about-us");
        assert_eq!(pages[0].content, "<p>new</p>");
    }

    #[test]
    fn invalid_status_is_a_validation_error() {
        let mut svc = service();
        let err = svc
            .create_page(PageRequest {
                status: Some("archived".into()),
                ..page("Blog")
            })
            .unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn categories_skip_existing_and_nameless_entries() {
        let mut svc = service();
        let req = || CategoriesRequest {
            categories: Some(vec![
                CategoryInput {
                    name: Some("Wicca".into()),
                    slug: None,
                },
                CategoryInput::default(),
                CategoryInput {
                    name: Some("Tarot Readings".into()),
                    slug: Some("tarot".into()),
                },
            ]),
        };

        let first = svc.create_categories(req()).unwrap();
        let slugs: Vec<_> = first.created.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["wicca", "tarot"]);

        let second = svc.create_categories(req()).unwrap();
        assert!(second.created.is_empty());
    }

    #[test]
    fn categories_field_is_required() {
        let mut svc = service();
        let err = svc.create_categories(CategoriesRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingField("categories")));
    }

    #[test]
    fn menu_rebuild_replaces_items_and_assigns_location() {
        let mut svc = service();
        let item = |title: &str| MenuItemInput {
            title: Some(title.into()),
            url: Some(format!("/{}", title.to_lowercase())),
        };

        let first = svc
            .create_menu(MenuRequest {
                name: Some("Main".into()),
                location: Some("primary".into()),
                items: vec![item("A"), item("B")],
            })
            .unwrap();
        let second = svc
            .create_menu(MenuRequest {
                name: Some("Main".into()),
                location: None,
                items: vec![item("C")],
            })
            .unwrap();

        assert_eq!(first.menu_id, second.menu_id);
        let items = svc.store().list_menu_items(second.menu_id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "C");
        assert_eq!(
            svc.store().get_option(options::MENU_LOCATIONS).unwrap(),
            Some(json!({ "primary": first.menu_id.0 }))
        );
    }

    #[test]
    fn homepage_resolves_by_id_then_slug() {
        let mut svc = service();
        let home = svc.create_page(page("Home")).unwrap();

        let by_slug = svc
            .set_homepage(HomepageRequest {
                page_id: Some(9999),
                slug: Some("home".into()),
            })
            .unwrap();
        assert_eq!(by_slug.page_id, home.page_id);
        assert_eq!(
            svc.store().get_string(options::SHOW_ON_FRONT).unwrap().as_deref(),
            Some("page")
        );

        let err = svc
            .set_homepage(HomepageRequest {
                page_id: None,
                slug: Some("missing".into()),
            })
            .unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = svc.set_homepage(HomepageRequest::default()).unwrap_err();
        assert_eq!(err.code(), "missing_field");
    }

    #[test]
    fn seo_setup_requires_active_extension() {
        let mut svc = service();
        let result = svc.setup_seo().unwrap();
        assert!(!result.success);

        svc.store_mut()
            .install_extension(
                &NewExtension {
                    slug: SEO_EXTENSION.into(),
                    name: "Rank Math SEO".into(),
                    version: "1".into(),
                    checksum: String::new(),
                },
                b"",
            )
            .unwrap();
        svc.store_mut().set_extension_active(SEO_EXTENSION, true).unwrap();
        svc.store_mut()
            .set_option("rank-math-options-titles", json!({ "custom": "kept" }))
            .unwrap();

        assert!(svc.setup_seo().unwrap().success);
        let titles = svc
            .store()
            .get_option("rank-math-options-titles")
            .unwrap()
            .unwrap();
        assert_eq!(titles["custom"], "kept");
        assert_eq!(titles["title_separator"], "-");
    }

    #[test]
    fn set_option_requires_name() {
        let mut svc = service();
        let err = svc.set_option(SetOptionRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::MissingField("option_name")));

        svc.set_option(SetOptionRequest {
            option_name: Some("posts_per_page".into()),
            option_value: json!(12),
        })
        .unwrap();
        assert_eq!(
            svc.store().get_option("posts_per_page").unwrap(),
            Some(json!(12))
        );
    }

    /// Serves one package whose archive downloads fine.
    struct OnePackage;

    #[async_trait]
    impl PackageSource for OnePackage {
        async fn resolve(&self, slug: &str) -> Result<PackageInfo, PackageError> {
            Ok(PackageInfo {
                slug: slug.to_string(),
                name: "Rank Math SEO".to_string(),
                version: "1.0.230".to_string(),
                download_url: format!("https://downloads.example/{}.zip", slug),
            })
        }

        async fn download(&self, _info: &PackageInfo) -> Result<Vec<u8>, PackageError> {
            Ok(b"PK\x03\x04".to_vec())
        }
    }

    /// In-memory store that refuses to activate extensions.
    struct NoActivation(InMemoryStore);

    impl SettingsStore for NoActivation {
        fn get_option(&self, key: &str) -> Result<Option<Value>, StorageError> {
            self.0.get_option(key)
        }

        fn set_option(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
            self.0.set_option(key, value)
        }
    }

    impl ContentStore for NoActivation {
        fn get_page(&self, id: PageId) -> Result<Option<Page>, StorageError> {
            self.0.get_page(id)
        }

        fn find_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StorageError> {
            self.0.find_page_by_slug(slug)
        }

        fn insert_page(&mut self, page: &NewPage) -> Result<PageId, StorageError> {
            self.0.insert_page(page)
        }

        fn update_page(&mut self, id: PageId, page: &NewPage) -> Result<(), StorageError> {
            self.0.update_page(id, page)
        }

        fn list_pages(&self) -> Result<Vec<Page>, StorageError> {
            self.0.list_pages()
        }

        fn find_term(&self, taxonomy: &str, slug: &str) -> Result<Option<Term>, StorageError> {
            self.0.find_term(taxonomy, slug)
        }

        fn insert_term(
            &mut self,
            taxonomy: &str,
            name: &str,
            slug: &str,
        ) -> Result<TermId, StorageError> {
            self.0.insert_term(taxonomy, name, slug)
        }

        fn list_terms(&self, taxonomy: &str) -> Result<Vec<Term>, StorageError> {
            self.0.list_terms(taxonomy)
        }

        fn find_menu(&self, name: &str) -> Result<Option<Menu>, StorageError> {
            self.0.find_menu(name)
        }

        fn create_menu(&mut self, name: &str) -> Result<MenuId, StorageError> {
            self.0.create_menu(name)
        }

        fn clear_menu_items(&mut self, menu: MenuId) -> Result<usize, StorageError> {
            self.0.clear_menu_items(menu)
        }

        fn insert_menu_item(
            &mut self,
            menu: MenuId,
            title: &str,
            url: &str,
            position: u32,
        ) -> Result<(), StorageError> {
            self.0.insert_menu_item(menu, title, url, position)
        }

        fn list_menu_items(&self, menu: MenuId) -> Result<Vec<MenuItem>, StorageError> {
            self.0.list_menu_items(menu)
        }

        fn list_extensions(&self) -> Result<Vec<Extension>, StorageError> {
            self.0.list_extensions()
        }

        fn get_extension(&self, slug: &str) -> Result<Option<Extension>, StorageError> {
            self.0.get_extension(slug)
        }

        fn install_extension(
            &mut self,
            extension: &NewExtension,
            archive: &[u8],
        ) -> Result<(), StorageError> {
            self.0.install_extension(extension, archive)
        }

        fn set_extension_active(&mut self, slug: &str, _active: bool) -> Result<(), StorageError> {
            Err(StorageError::IntegrityError {
                reason: format!("activation of '{}' refused", slug),
            })
        }
    }

    #[tokio::test]
    async fn activation_failure_still_reports_installed() {
        let mut svc = SiteService::new(
            Box::new(NoActivation(InMemoryStore::new())),
            Arc::new(OnePackage),
        );
        let resp = svc
            .install_plugin(InstallPluginRequest {
                slug: Some("seo-by-rank-math".into()),
            })
            .await
            .unwrap();

        assert!(resp.success);
        assert_eq!(resp.plugin.name, "Rank Math SEO");
        assert!(!resp.plugin.active);
        assert_eq!(svc.list_plugins().unwrap().len(), 1);
    }
}
