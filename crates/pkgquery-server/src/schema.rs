//! Request and response schemas for the HTTP surface.
//!
//! Every response type carries an optional `error` field instead of the
//! service ever answering with a transport-level failure: unsupported
//! registries, missing packages and upstream faults all come back as a
//! structurally valid result with `error` populated and data fields
//! defaulted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_package_manager() -> String {
    "pip".into()
}

/// Query for `/package_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageQuery {
    pub package_name: String,
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    /// Accepted for wire compatibility; package info always covers the
    /// whole version set.
    #[serde(default)]
    pub version: Option<String>,
}

/// Query for `/dependencies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyQuery {
    pub package_name: String,
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    /// Version to inspect; the latest when omitted.
    #[serde(default)]
    pub version: Option<String>,
    /// Accepted for wire compatibility; transitive resolution is out of
    /// scope and the value is ignored.
    #[serde(default)]
    pub depth: Option<u32>,
}

/// Query for `/compatible_versions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionQuery {
    pub package_name: String,
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    #[serde(default)]
    pub version_constraint: Option<String>,
}

/// Result of `/package_info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageResult {
    pub package_name: String,
    pub package_manager: String,
    pub versions: Vec<String>,
    pub latest_version: String,
    pub description: Option<String>,
    pub error: Option<String>,
}

/// Result of `/dependencies`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyResult {
    pub package_name: String,
    pub package_manager: String,
    pub dependencies: BTreeMap<String, String>,
    pub error: Option<String>,
}

/// Result of `/compatible_versions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionResult {
    pub package_name: String,
    pub package_manager: String,
    pub compatible_versions: Vec<String>,
    pub recommended_version: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_manager_defaults_to_pip() {
        let query: PackageQuery =
            serde_json::from_str(r#"{"package_name": "flask"}"#).unwrap();
        assert_eq!(query.package_manager, "pip");
        assert_eq!(query.version, None);
    }

    #[test]
    fn test_version_query_constraint_optional() {
        let query: VersionQuery = serde_json::from_str(
            r#"{"package_name": "express", "package_manager": "npm"}"#,
        )
        .unwrap();
        assert_eq!(query.version_constraint, None);
    }

    #[test]
    fn test_dependency_query_accepts_depth() {
        let query: DependencyQuery = serde_json::from_str(
            r#"{"package_name": "flask", "depth": 2}"#,
        )
        .unwrap();
        assert_eq!(query.depth, Some(2));
    }

    #[test]
    fn test_result_serializes_null_fields() {
        let result = VersionResult {
            package_name: "flask".into(),
            package_manager: "pip".into(),
            compatible_versions: vec![],
            recommended_version: None,
            error: Some("package not found: flask".into()),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["recommended_version"].is_null());
        assert_eq!(json["error"], "package not found: flask");
    }
}
