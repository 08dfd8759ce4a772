//! Extension package directory client.
//!
//! [`PackageSource`] is the seam between the install pipeline and wherever
//! extension packages come from. [`DirectoryClient`] talks to a
//! WordPress.org-compatible plugin information API over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default plugin information endpoint.
pub const DEFAULT_PACKAGE_API: &str = "https://api.wordpress.org/plugins/info/1.2/";

/// Metadata resolved for an extension slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub slug: String,
    pub name: String,
    pub version: String,
    /// Where the package archive can be downloaded from.
    #[serde(rename = "download_link")]
    pub download_url: String,
}

/// Failures reported by a package source.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The directory has no package with that slug.
    #[error("package '{0}' not found in directory")]
    NotFound(String),

    /// The directory answered with a non-success status.
    #[error("package directory returned {status}: {message}")]
    Directory { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("package directory request failed: {0}")]
    Transport(String),
}

impl PackageError {
    /// HTTP status this failure is reported with.
    pub fn status(&self) -> u16 {
        match self {
            PackageError::NotFound(_) => 404,
            PackageError::Directory { status, .. } => *status,
            PackageError::Transport(_) => 502,
        }
    }
}

impl From<reqwest::Error> for PackageError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => PackageError::Directory {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => PackageError::Transport(err.to_string()),
        }
    }
}

/// Source of extension packages.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Resolves metadata for `slug`.
    async fn resolve(&self, slug: &str) -> Result<PackageInfo, PackageError>;

    /// Downloads the package archive described by `info`.
    async fn download(&self, info: &PackageInfo) -> Result<Vec<u8>, PackageError>;
}

/// HTTP client for a plugin information directory.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
}

/// Error payload the directory returns for unknown slugs.
#[derive(Debug, Deserialize)]
struct DirectoryErrorBody {
    error: String,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        DirectoryClient {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for DirectoryClient {
    fn default() -> Self {
        DirectoryClient::new(DEFAULT_PACKAGE_API)
    }
}

#[async_trait]
impl PackageSource for DirectoryClient {
    async fn resolve(&self, slug: &str) -> Result<PackageInfo, PackageError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("action", "plugin_information"),
                ("request[slug]", slug),
                ("request[fields][sections]", "0"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;

        if let Ok(err) = serde_json::from_value::<DirectoryErrorBody>(body.clone()) {
            tracing::debug!(slug, status = status.as_u16(), error = %err.error, "directory lookup failed");
            return Err(PackageError::NotFound(slug.to_string()));
        }
        if !status.is_success() {
            return Err(PackageError::Directory {
                status: status.as_u16(),
                message: body.to_string(),
            });
        }

        serde_json::from_value(body).map_err(|e| PackageError::Directory {
            status: 502,
            message: format!("malformed package metadata: {}", e),
        })
    }

    async fn download(&self, info: &PackageInfo) -> Result<Vec<u8>, PackageError> {
        let response = self
            .http
            .get(&info.download_url)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tracing::debug!(slug = %info.slug, size = bytes.len(), "package downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_info_reads_directory_field_names() {
        let info: PackageInfo = serde_json::from_value(serde_json::json!({
            "slug": "seo-by-rank-math",
            "name": "Rank Math SEO",
            "version": "1.0.230",
            "download_link": "https://downloads.example.org/seo-by-rank-math.zip",
            "author": "ignored"
        }))
        .unwrap();
        assert_eq!(info.download_url, "https://downloads.example.org/seo-by-rank-math.zip");
    }

    #[test]
    fn error_statuses() {
        assert_eq!(PackageError::NotFound("x".into()).status(), 404);
        assert_eq!(PackageError::Transport("dns".into()).status(), 502);
        assert_eq!(
            PackageError::Directory {
                status: 503,
                message: "down".into()
            }
            .status(),
            503
        );
    }
}
