//! npm registry client.
//!
//! Fetches package metadata from the npm registry
//! (<https://registry.npmjs.org/{package}>) and normalizes it into the
//! shared [`PackageInfo`] shape. Versions come from the `versions` keys,
//! the latest version from `dist-tags.latest`, and dependencies from the
//! per-version `dependencies` map.

use async_trait::async_trait;
use pkgquery_core::{CoreError, HttpClient, PackageInfo, compare_versions};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

const REGISTRY_BASE: &str = "https://registry.npmjs.org";

/// Client for the npm registry.
#[derive(Clone)]
pub struct NpmRegistry {
    http: Arc<HttpClient>,
    base_url: String,
}

impl NpmRegistry {
    /// Creates an npm client talking to registry.npmjs.org.
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_base_url(http, REGISTRY_BASE)
    }

    /// Creates an npm client with a custom base URL. Used by tests to
    /// point at a mock server.
    pub fn with_base_url(http: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, name: &str) -> pkgquery_core::Result<NpmResponse> {
        tracing::debug!(package = name, "querying npm registry");
        let url = format!("{}/{}", self.base_url, urlencoding::encode(name));

        let data = self.http.get(&url).await.map_err(|e| match e {
            CoreError::RegistryStatus { status: 404, .. } => CoreError::PackageNotFound {
                package: name.to_string(),
            },
            other => other,
        })?;

        Ok(serde_json::from_slice(&data)?)
    }
}

#[async_trait]
impl pkgquery_core::Registry for NpmRegistry {
    fn id(&self) -> &'static str {
        "npm"
    }

    async fn package_info(&self, name: &str) -> pkgquery_core::Result<PackageInfo> {
        let response = self.fetch(name).await?;
        Ok(normalize_info(response))
    }

    async fn dependencies(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> pkgquery_core::Result<BTreeMap<String, String>> {
        let response = self.fetch(name).await?;
        Ok(extract_dependencies(response, version))
    }
}

// JSON response types

#[derive(Debug, Deserialize)]
struct NpmResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "dist-tags")]
    dist_tags: DistTags,
    versions: HashMap<String, VersionMetadata>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    latest: String,
}

#[derive(Debug, Deserialize)]
struct VersionMetadata {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

/// Maps an npm response into the normalized package shape.
///
/// Version keys are sorted newest-first; the latest version is whatever
/// the `latest` dist-tag points at, not a sort-derived value.
fn normalize_info(response: NpmResponse) -> PackageInfo {
    let mut versions: Vec<String> = response.versions.into_keys().collect();
    versions.sort_by(|a, b| compare_versions(b, a));

    PackageInfo {
        name: response.name,
        versions,
        latest_version: response.dist_tags.latest,
        description: response.description,
    }
}

/// Extracts the `dependencies` map of the requested (or latest) version.
///
/// A version the registry does not know yields an empty map, mirroring
/// the reference behavior.
fn extract_dependencies(mut response: NpmResponse, version: Option<&str>) -> BTreeMap<String, String> {
    let version_to_check = version.unwrap_or(&response.dist_tags.latest).to_string();

    response
        .versions
        .remove(&version_to_check)
        .map(|meta| meta.dependencies)
        .unwrap_or_default()
}
