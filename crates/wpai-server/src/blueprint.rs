//! Blueprint runner: one request that chains the individual operations.
//!
//! Sections run in a fixed order (basic → categories → pages → menus →
//! homepage → extension configs). Each present section calls the matching
//! [`SiteService`] operation in-process and appends its report line whether
//! or not the call succeeded. List sections call the single-item operation
//! once per element, in order; a failed element never stops the next one.
//! Nothing is rolled back.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::schema::blueprint::{BlueprintResponse, BlueprintSpec};
use crate::schema::content::{CategoriesRequest, HomepageRequest, MenuRequest, PageRequest};
use crate::schema::site::BasicSetupRequest;
use crate::service::SiteService;

/// Extension configurators recognized in the `plugins` section.
type Configurator = fn(&mut SiteService) -> Result<bool, ApiError>;

const EXTENSION_CONFIGURATORS: &[(&[&str], Configurator, &str)] = &[(
    &["rankmath", "rank-math", "seo-by-rank-math"],
    configure_seo,
    "Rank Math configured",
)];

fn configure_seo(service: &mut SiteService) -> Result<bool, ApiError> {
    service.setup_seo().map(|r| r.success)
}

/// Outcome of one operation call inside a blueprint run.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub section: &'static str,
    pub ok: bool,
    pub detail: Option<String>,
}

/// Everything a blueprint run produced.
#[derive(Debug, Clone, Default)]
pub struct BlueprintReport {
    /// One human-readable line per executed section.
    pub lines: Vec<String>,
    /// Per-call outcomes, in call order.
    pub outcomes: Vec<StepOutcome>,
}

impl BlueprintReport {
    fn record<T>(&mut self, section: &'static str, result: Result<T, ApiError>) {
        let outcome = match result {
            Ok(_) => StepOutcome {
                section,
                ok: true,
                detail: None,
            },
            Err(err) => {
                tracing::warn!(section, code = err.code(), error = %err, "blueprint step failed");
                StepOutcome {
                    section,
                    ok: false,
                    detail: Some(err.to_string()),
                }
            }
        };
        self.outcomes.push(outcome);
    }

    fn line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Number of calls that failed.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.ok).count()
    }
}

impl From<BlueprintReport> for BlueprintResponse {
    fn from(report: BlueprintReport) -> Self {
        BlueprintResponse {
            success: true,
            report: report.lines,
        }
    }
}

/// Decodes one blueprint element into an operation request.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
}

/// A list section as its elements. A lone object counts as a one-element
/// list.
fn elements(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// `{categories: [...]}` or the bare list.
fn categories_request(value: Value) -> Result<CategoriesRequest, ApiError> {
    match value {
        Value::Array(_) => Ok(CategoriesRequest {
            categories: Some(decode(value)?),
        }),
        other => decode(other),
    }
}

/// `{page_id}`, `{slug}`, a bare ID or a bare slug.
fn homepage_request(value: Value) -> Result<HomepageRequest, ApiError> {
    match value {
        Value::Number(n) => Ok(HomepageRequest {
            page_id: n.as_i64(),
            slug: None,
        }),
        Value::String(slug) => Ok(HomepageRequest {
            page_id: None,
            slug: Some(slug),
        }),
        other => decode(other),
    }
}

/// Extension identifier of a `plugins` entry: a string or a record with a
/// `name`/`slug`/`id` field.
fn extension_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["name", "slug", "id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

impl SiteService {
    /// Runs every present blueprint section in order.
    pub fn run_blueprint(&mut self, spec: BlueprintSpec) -> BlueprintReport {
        let mut report = BlueprintReport::default();

        if let Some(basic) = spec.basic {
            let result = decode::<BasicSetupRequest>(basic).and_then(|req| self.basic_setup(req));
            report.record("basic", result);
            report.line("Basic settings configured");
        }

        if let Some(categories) = spec.categories {
            let result =
                categories_request(categories).and_then(|req| self.create_categories(req));
            report.record("categories", result);
            report.line("Categories created");
        }

        if let Some(pages) = spec.pages {
            for page in elements(pages) {
                let result = decode::<PageRequest>(page).and_then(|req| self.create_page(req));
                report.record("pages", result);
            }
            report.line("Pages created");
        }

        if let Some(menus) = spec.menus {
            for menu in elements(menus) {
                let result = decode::<MenuRequest>(menu).and_then(|req| self.create_menu(req));
                report.record("menus", result);
            }
            report.line("Menus created");
        }

        if let Some(homepage) = spec.homepage {
            let result = homepage_request(homepage).and_then(|req| self.set_homepage(req));
            report.record("homepage", result);
            report.line("Homepage set");
        }

        if let Some(plugins) = spec.plugins {
            for entry in elements(plugins) {
                let Some(identifier) = extension_identifier(&entry) else {
                    continue;
                };
                let key = identifier.trim().to_lowercase();
                let Some((_, configure, line)) = EXTENSION_CONFIGURATORS
                    .iter()
                    .find(|(names, _, _)| names.contains(&key.as_str()))
                else {
                    tracing::debug!(identifier = %identifier, "no configurator for extension");
                    continue;
                };
                let result = configure(&mut *self);
                report.record("plugins", result);
                report.line(line);
            }
        }

        tracing::info!(
            sections = report.lines.len(),
            calls = report.outcomes.len(),
            failures = report.failures(),
            "blueprint finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use wpai_storage::InMemoryStore;

    use super::*;
    use crate::packages::{PackageError, PackageInfo, PackageSource};

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

    fn spec(value: Value) -> BlueprintSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn report_follows_fixed_section_order() {
        let mut svc = service();
        let report = svc.run_blueprint(spec(json!({
            "homepage": "home",
            "pages": [{ "title": "Home" }],
            "basic": { "title": "Coven" },
            "menus": [{ "name": "Main", "items": [{ "title": "Home", "url": "/" }] }],
            "categories": [{ "name": "Wicca" }]
        })));

        assert_eq!(
            report.lines,
            vec![
                "Basic settings configured",
                "Categories created",
                "Pages created",
                "Menus created",
                "Homepage set",
            ]
        );
        assert_eq!(report.failures(), 0);
    }

    #[test]
    fn absent_and_null_sections_are_skipped() {
        let mut svc = service();
        let report = svc.run_blueprint(spec(json!({ "basic": null, "pages": [{ "title": "A" }] })));
        assert_eq!(report.lines, vec!["Pages created"]);
        assert!(svc.store().get_option("timezone_string").unwrap().is_none());
    }

    #[test]
    fn failing_section_still_reports_its_line() {
        let mut svc = service();
        let report = svc.run_blueprint(spec(json!({ "homepage": { "slug": "nowhere" } })));
        assert_eq!(report.lines, vec!["Homepage set"]);
        assert_eq!(report.failures(), 1);
    }

    #[test]
    fn malformed_page_does_not_stop_the_rest() {
        let mut svc = service();
        let report = svc.run_blueprint(spec(json!({
            "pages": [
                { "title": "About" },
                { "content": "no title" },
                { "title": 42 },
                { "title": "Contact" }
            ]
        })));

        assert_eq!(report.lines, vec!["Pages created"]);
        assert_eq!(report.failures(), 2);
        let slugs: Vec<_> = svc
            .store()
            .list_pages()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["about", "contact"]);
    }

    #[test]
    fn categories_accept_wrapped_form() {
        let mut svc = service();
        svc.run_blueprint(spec(json!({
            "basic_setup": {},
            "categories": { "categories": [{ "name": "Herbs" }] }
        })));
        assert_eq!(svc.store().list_terms("category").unwrap().len(), 1);
        assert_eq!(
            svc.store().get_string("timezone_string").unwrap().as_deref(),
            Some("UTC")
        );
    }

    #[test]
    fn unknown_extensions_are_silently_skipped() {
        let mut svc = service();
        let report = svc.run_blueprint(spec(json!({
            "plugins": ["woocommerce", { "name": "RankMath" }, 7]
        })));
        assert_eq!(report.lines, vec!["Rank Math configured"]);
        assert_eq!(report.outcomes.len(), 1);
    }
}
