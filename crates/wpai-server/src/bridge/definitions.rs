//! The static capability table.

use std::sync::{Arc, OnceLock};

use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::callback::OperationHandler;
use super::registry::CapabilityEntry;
use crate::service::SiteService;

/// In-process operation a capability runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SiteInfo,
    BasicSetup,
    CreateCategories,
    CreatePage,
    CreateMenu,
    SetHomepage,
    SetupSeo,
    SetOption,
    ListPlugins,
    InstallPlugin,
    RunBlueprint,
}

/// A capability as declared, before it is bound to a service.
#[derive(Debug, Clone)]
pub struct CapabilityDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub output_schema: Value,
    pub operation: Operation,
}

impl CapabilityDefinition {
    /// Binds the definition to `service`, producing a registrable entry.
    pub fn bind(&self, service: Arc<Mutex<SiteService>>) -> CapabilityEntry {
        CapabilityEntry {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            handler: Arc::new(OperationHandler::new(self.operation, service)),
        }
    }
}

/// Every capability, in registration order.
pub fn definitions() -> &'static [CapabilityDefinition] {
    static TABLE: OnceLock<Vec<CapabilityDefinition>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Looks a capability up by name.
pub fn find(name: &str) -> Option<&'static CapabilityDefinition> {
    definitions().iter().find(|d| d.name == name)
}

/// Binds the full table to one service.
pub fn bind_all(service: &Arc<Mutex<SiteService>>) -> Vec<CapabilityEntry> {
    definitions().iter().map(|d| d.bind(service.clone())).collect()
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn message_result() -> Value {
    object(
        json!({
            "success": { "type": "boolean" },
            "message": { "type": "string" },
        }),
        &["success"],
    )
}

fn build_table() -> Vec<CapabilityDefinition> {
    let plugin = json!({
        "type": "object",
        "properties": {
            "path": { "type": "string" },
            "name": { "type": "string" },
            "version": { "type": "string" },
            "active": { "type": "boolean" },
        },
    });

    vec![
        CapabilityDefinition {
            name: "wpai.site_info",
            description: "Site name, URL, timezone, front page settings and installed plugins.",
            input_schema: object(json!({}), &[]),
            output_schema: object(
                json!({
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "url": { "type": "string" },
                    "timezone": { "type": "string" },
                    "permalink_structure": { "type": "string" },
                    "show_on_front": { "type": "string" },
                    "page_on_front": { "type": ["integer", "null"] },
                    "version": { "type": "string" },
                    "plugins": { "type": "array", "items": plugin.clone() },
                }),
                &["name", "url"],
            ),
            operation: Operation::SiteInfo,
        },
        CapabilityDefinition {
            name: "wpai.basic_setup",
            description: "Set permalink structure, timezone, site title and tagline.",
            input_schema: object(
                json!({
                    "permalink": { "type": "string", "default": "/%postname%/" },
                    "timezone": { "type": "string", "default": "UTC" },
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                }),
                &[],
            ),
            output_schema: message_result(),
            operation: Operation::BasicSetup,
        },
        CapabilityDefinition {
            name: "wpai.create_categories",
            description: "Create categories that do not exist yet.",
            input_schema: object(
                json!({
                    "categories": {
                        "type": "array",
                        "items": object(
                            json!({
                                "name": { "type": "string" },
                                "slug": { "type": "string" },
                            }),
                            &["name"],
                        ),
                    },
                }),
                &["categories"],
            ),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "created": { "type": "array" },
                }),
                &["success"],
            ),
            operation: Operation::CreateCategories,
        },
        CapabilityDefinition {
            name: "wpai.create_page",
            description: "Create a page, or update the page with the same slug.",
            input_schema: object(
                json!({
                    "title": { "type": "string" },
                    "slug": { "type": "string" },
                    "content": { "type": "string" },
                    "status": {
                        "type": "string",
                        "enum": ["publish", "draft", "pending", "private"],
                    },
                }),
                &["title"],
            ),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "page_id": { "type": "integer" },
                    "action": { "type": "string", "enum": ["created", "updated"] },
                }),
                &["success"],
            ),
            operation: Operation::CreatePage,
        },
        CapabilityDefinition {
            name: "wpai.create_menu",
            description: "Create or rebuild a navigation menu and optionally assign it to a theme location.",
            input_schema: object(
                json!({
                    "name": { "type": "string" },
                    "location": { "type": "string" },
                    "items": {
                        "type": "array",
                        "items": object(
                            json!({
                                "title": { "type": "string" },
                                "url": { "type": "string" },
                            }),
                            &["title", "url"],
                        ),
                    },
                }),
                &["name"],
            ),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "menu_id": { "type": "integer" },
                    "items": { "type": "integer" },
                }),
                &["success"],
            ),
            operation: Operation::CreateMenu,
        },
        CapabilityDefinition {
            name: "wpai.set_homepage",
            description: "Show a static page on the front page, chosen by ID or slug.",
            input_schema: object(
                json!({
                    "page_id": { "type": "integer" },
                    "slug": { "type": "string" },
                }),
                &[],
            ),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "page_id": { "type": "integer" },
                }),
                &["success"],
            ),
            operation: Operation::SetHomepage,
        },
        CapabilityDefinition {
            name: "wpai.setup_rankmath",
            description: "Apply SEO defaults when Rank Math is active.",
            input_schema: object(json!({}), &[]),
            output_schema: message_result(),
            operation: Operation::SetupSeo,
        },
        CapabilityDefinition {
            name: "wpai.set_option",
            description: "Write one site option.",
            input_schema: object(
                json!({
                    "option_name": { "type": "string" },
                    "option_value": {},
                }),
                &["option_name"],
            ),
            output_schema: message_result(),
            operation: Operation::SetOption,
        },
        CapabilityDefinition {
            name: "wpai.list_plugins",
            description: "List installed plugins with their active state.",
            input_schema: object(json!({}), &[]),
            output_schema: json!({ "type": "array", "items": plugin.clone() }),
            operation: Operation::ListPlugins,
        },
        CapabilityDefinition {
            name: "wpai.install_plugin",
            description: "Install a plugin from the package directory and activate it.",
            input_schema: object(json!({ "slug": { "type": "string" } }), &["slug"]),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "message": { "type": "string" },
                    "plugin": plugin,
                }),
                &["success"],
            ),
            operation: Operation::InstallPlugin,
        },
        CapabilityDefinition {
            name: "wpai.run_blueprint",
            description: "Run a site blueprint: settings, categories, pages, menus, homepage and plugin configuration in one call.",
            input_schema: object(
                json!({
                    "basic": { "type": "object" },
                    "categories": { "type": "array" },
                    "pages": { "type": "array" },
                    "menus": { "type": "array" },
                    "homepage": {},
                    "plugins": { "type": "array" },
                }),
                &[],
            ),
            output_schema: object(
                json!({
                    "success": { "type": "boolean" },
                    "report": { "type": "array", "items": { "type": "string" } },
                }),
                &["success", "report"],
            ),
            operation: Operation::RunBlueprint,
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique_and_namespaced() {
        let names: HashSet<_> = definitions().iter().map(|d| d.name).collect();
        assert_eq!(names.len(), definitions().len());
        assert_eq!(names.len(), 11);
        assert!(names.iter().all(|n| n.starts_with("wpai.")));
    }

    #[test]
    fn every_operation_has_one_capability() {
        let ops: HashSet<_> = definitions().iter().map(|d| d.operation).collect();
        assert_eq!(ops.len(), definitions().len());
    }

    #[test]
    fn input_schemas_are_objects() {
        for def in definitions() {
            assert_eq!(def.input_schema["type"], "object", "{}", def.name);
        }
        assert_eq!(
            find("wpai.create_page").map(|d| d.operation),
            Some(Operation::CreatePage)
        );
        assert!(find("wpai.unknown").is_none());
    }
}
