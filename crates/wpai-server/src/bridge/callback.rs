//! Capability callbacks backed by [`SiteService`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::definitions::Operation;
use super::normalize::normalize_args;
use super::registry::CapabilityHandler;
use crate::error::ApiError;
use crate::schema::blueprint::BlueprintResponse;
use crate::service::SiteService;

/// Runs one operation against a shared service.
pub struct OperationHandler {
    operation: Operation,
    service: Arc<Mutex<SiteService>>,
}

impl OperationHandler {
    pub fn new(operation: Operation, service: Arc<Mutex<SiteService>>) -> Self {
        OperationHandler { operation, service }
    }
}

#[async_trait]
impl CapabilityHandler for OperationHandler {
    async fn call(&self, args: Value) -> Value {
        let args = normalize_args(&args);
        match invoke(&self.service, self.operation, args).await {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(operation = ?self.operation, code = err.code(), "capability call failed");
                err.to_body()
            }
        }
    }
}

fn request<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(args)).map_err(|e| ApiError::Validation(e.to_string()))
}

fn body<T: Serialize>(result: T) -> Result<Value, ApiError> {
    serde_json::to_value(result).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Decodes `args` into the operation's request and runs it.
pub async fn invoke(
    service: &Mutex<SiteService>,
    operation: Operation,
    args: Map<String, Value>,
) -> Result<Value, ApiError> {
    let mut svc = service.lock().await;
    match operation {
        Operation::SiteInfo => body(svc.site_info()?),
        Operation::BasicSetup => body(svc.basic_setup(request(args)?)?),
        Operation::CreateCategories => body(svc.create_categories(request(args)?)?),
        Operation::CreatePage => body(svc.create_page(request(args)?)?),
        Operation::CreateMenu => body(svc.create_menu(request(args)?)?),
        Operation::SetHomepage => body(svc.set_homepage(request(args)?)?),
        Operation::SetupSeo => body(svc.setup_seo()?),
        Operation::SetOption => body(svc.set_option(request(args)?)?),
        Operation::ListPlugins => body(svc.list_plugins()?),
        Operation::InstallPlugin => body(svc.install_plugin(request(args)?).await?),
        Operation::RunBlueprint => {
            let report = svc.run_blueprint(request(args)?);
            body(BlueprintResponse::from(report))
        }
    }
}

#[cfg(test)]
mod tests {
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

    fn handler_for(operation: Operation) -> (OperationHandler, Arc<Mutex<SiteService>>) {
        let service = Arc::new(Mutex::new(SiteService::new(
            Box::new(InMemoryStore::new()),
            Arc::new(NoPackages),
        )));
        (OperationHandler::new(operation, service.clone()), service)
    }

    #[tokio::test]
    async fn pair_list_arguments_reach_the_operation() {
        let (handler, service) = handler_for(Operation::CreatePage);
        let result = handler
            .call(json!([["title", "Services"], ["status", "draft"]]))
            .await;

        assert_eq!(result["success"], true);
        assert_eq!(result["action"], "created");
        let svc = service.lock().await;
        let page = svc.store().find_page_by_slug("services").unwrap().unwrap();
        assert_eq!(page.status, "draft");
    }

    #[tokio::test]
    async fn failures_come_back_as_error_bodies() {
        let (handler, _) = handler_for(Operation::CreatePage);
        let result = handler.call(json!("not a mapping")).await;
        assert_eq!(result["success"], false);
        assert_eq!(result["error"]["code"], "missing_field");

        let (handler, _) = handler_for(Operation::InstallPlugin);
        let result = handler.call(json!({ "slug": "nope" })).await;
        assert_eq!(result["error"]["code"], "upstream_error");
        assert_eq!(result["error"]["status"], 404);
    }

    #[tokio::test]
    async fn blueprint_runs_through_the_callback() {
        let (handler, _) = handler_for(Operation::RunBlueprint);
        let result = handler
            .call(json!({ "categories": [{ "name": "Wicca" }] }))
            .await;
        assert_eq!(result, json!({ "success": true, "report": ["Categories created"] }));
    }
}
