//! PyPI registry client.
//!
//! Fetches package metadata from the PyPI JSON API
//! (<https://pypi.org/pypi/{package}/json>) and normalizes it into the
//! shared [`PackageInfo`] shape. Versions come from the `releases` keys,
//! the latest version and description from the `info` block, and declared
//! dependencies from `info.requires_dist`.

use crate::error::{PypiError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use pkgquery_core::{CoreError, HttpClient, PackageInfo, compare_versions};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

const PYPI_BASE: &str = "https://pypi.org/pypi";

/// Normalize package name according to PEP 503.
///
/// Converts the name to lowercase and collapses runs of `-`, `_` and `.`
/// into single hyphens, so lookups succeed regardless of how the name is
/// written.
///
/// # Examples
///
/// ```
/// # use pkgquery_pypi::registry::normalize_package_name;
/// assert_eq!(normalize_package_name("Flask"), "flask");
/// assert_eq!(normalize_package_name("django_rest_framework"), "django-rest-framework");
/// assert_eq!(normalize_package_name("my__package"), "my-package");
/// ```
pub fn normalize_package_name(name: &str) -> String {
    name.to_lowercase()
        .replace(['_', '.'], "-")
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Client for the PyPI registry.
#[derive(Clone)]
pub struct PypiRegistry {
    http: Arc<HttpClient>,
    base_url: String,
}

impl PypiRegistry {
    /// Creates a PyPI client talking to pypi.org.
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self::with_base_url(http, PYPI_BASE)
    }

    /// Creates a PyPI client with a custom base URL. Used by tests to
    /// point at a mock server.
    pub fn with_base_url(http: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, name: &str) -> Result<PypiResponse> {
        let normalized = normalize_package_name(name);
        tracing::debug!(package = name, normalized = %normalized, "querying PyPI");
        let url = format!(
            "{}/{}/json",
            self.base_url,
            urlencoding::encode(&normalized)
        );

        let data = self.http.get(&url).await.map_err(|e| match e {
            CoreError::RegistryStatus { status: 404, .. } => PypiError::PackageNotFound {
                package: name.to_string(),
            },
            other => PypiError::RegistryError {
                package: name.to_string(),
                source: other,
            },
        })?;

        serde_json::from_slice(&data).map_err(|e| PypiError::ApiResponseError {
            package: name.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl pkgquery_core::Registry for PypiRegistry {
    fn id(&self) -> &'static str {
        "pip"
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
        Ok(extract_dependencies(&response, version))
    }
}

// JSON response types

#[derive(Debug, Deserialize)]
struct PypiResponse {
    info: PypiInfo,
    #[serde(default)]
    releases: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PypiInfo {
    name: String,
    version: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// Maps a PyPI response into the normalized package shape.
///
/// Version keys are sorted newest-first; the latest version is the one
/// PyPI reports in `info.version`, not a sort-derived value.
fn normalize_info(response: PypiResponse) -> PackageInfo {
    let mut versions: Vec<String> = response.releases.into_keys().collect();
    versions.sort_by(|a, b| compare_versions(b, a));

    PackageInfo {
        name: response.info.name,
        versions,
        latest_version: response.info.version,
        description: response.info.summary,
    }
}

/// Extracts declared dependencies for the requested (or latest) version.
///
/// PyPI only publishes `requires_dist` for the latest release; the
/// reference service applied it to whichever known version was asked for,
/// and that behavior is preserved here. Unknown versions yield an empty
/// map.
fn extract_dependencies(
    response: &PypiResponse,
    version: Option<&str>,
) -> BTreeMap<String, String> {
    let version_to_check = version.unwrap_or(&response.info.version);

    let mut dependencies = BTreeMap::new();
    if !response.releases.contains_key(version_to_check) {
        return dependencies;
    }

    for requirement in response.info.requires_dist.iter().flatten() {
        if let Some((name, constraint)) = split_requirement(requirement) {
            dependencies.insert(name, constraint);
        }
    }

    dependencies
}

/// Splits a PEP 508 requirement string into a name and the trailing
/// constraint expression.
///
/// The name is everything before the first comparison character, trimmed;
/// the remainder (constraints, extras markers) is kept verbatim.
fn split_requirement(requirement: &str) -> Option<(String, String)> {
    static REQUIREMENT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^([^<>=~!]+)(.*)$").unwrap());

    let captures = REQUIREMENT_RE.captures(requirement)?;
    let name = captures.get(1)?.as_str().trim().to_string();
    if name.is_empty() {
        return None;
    }
    let constraint = captures.get(2).map_or("", |m| m.as_str()).to_string();
    Some((name, constraint))
}
