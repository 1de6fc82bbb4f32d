//! Endpoint handlers.
//!
//! Every operation runs inside [`catch_fault`], the single combinator that
//! converts any internal failure into the result schema's `error` field.
//! Handlers therefore always answer HTTP 200 with a structurally valid
//! result; no code path surfaces a fault to the caller.

use crate::AppState;
use crate::schema::{
    DependencyQuery, DependencyResult, PackageQuery, PackageResult, VersionQuery, VersionResult,
};
use axum::Json;
use axum::extract::State;
use pkgquery_core::resolver::resolve;
use serde_json::{Value, json};
use std::future::Future;

/// A result shape that can be built from a failure, with identifying
/// fields populated and data fields defaulted.
trait FaultResult {
    fn fault(package_name: &str, package_manager: &str, error: String) -> Self;
}

/// Runs an operation and reshapes any error into the result schema.
async fn catch_fault<T, F>(package_name: &str, package_manager: &str, op: F) -> T
where
    T: FaultResult,
    F: Future<Output = pkgquery_core::Result<T>>,
{
    match op.await {
        Ok(result) => result,
        Err(error) => {
            tracing::warn!(package_name, package_manager, %error, "request failed");
            T::fault(package_name, package_manager, error.to_string())
        }
    }
}

impl FaultResult for PackageResult {
    fn fault(package_name: &str, package_manager: &str, error: String) -> Self {
        Self {
            package_name: package_name.to_string(),
            package_manager: package_manager.to_string(),
            versions: vec![],
            latest_version: String::new(),
            description: None,
            error: Some(error),
        }
    }
}

impl FaultResult for DependencyResult {
    fn fault(package_name: &str, package_manager: &str, error: String) -> Self {
        Self {
            package_name: package_name.to_string(),
            package_manager: package_manager.to_string(),
            dependencies: Default::default(),
            error: Some(error),
        }
    }
}

impl FaultResult for VersionResult {
    fn fault(package_name: &str, package_manager: &str, error: String) -> Self {
        Self {
            package_name: package_name.to_string(),
            package_manager: package_manager.to_string(),
            compatible_versions: vec![],
            recommended_version: None,
            error: Some(error),
        }
    }
}

/// `POST /package_info`
pub async fn package_info(
    State(state): State<AppState>,
    Json(query): Json<PackageQuery>,
) -> Json<PackageResult> {
    let manager = query.package_manager.to_lowercase();

    let result = catch_fault(&query.package_name, &manager, async {
        let registry = state.registries.get(&manager)?;
        let info = registry.package_info(&query.package_name).await?;

        Ok(PackageResult {
            package_name: query.package_name.clone(),
            package_manager: manager.clone(),
            versions: info.versions,
            latest_version: info.latest_version,
            description: info.description,
            error: None,
        })
    })
    .await;

    Json(result)
}

/// `POST /dependencies`
pub async fn dependencies(
    State(state): State<AppState>,
    Json(query): Json<DependencyQuery>,
) -> Json<DependencyResult> {
    let manager = query.package_manager.to_lowercase();

    let result = catch_fault(&query.package_name, &manager, async {
        let registry = state.registries.get(&manager)?;
        let dependencies = registry
            .dependencies(&query.package_name, query.version.as_deref())
            .await?;

        Ok(DependencyResult {
            package_name: query.package_name.clone(),
            package_manager: manager.clone(),
            dependencies,
            error: None,
        })
    })
    .await;

    Json(result)
}

/// `POST /compatible_versions`
pub async fn compatible_versions(
    State(state): State<AppState>,
    Json(query): Json<VersionQuery>,
) -> Json<VersionResult> {
    let manager = query.package_manager.to_lowercase();

    let result = catch_fault(&query.package_name, &manager, async {
        let registry = state.registries.get(&manager)?;
        let info = registry.package_info(&query.package_name).await?;

        let resolution = resolve(
            &info.versions,
            &info.latest_version,
            query.version_constraint.as_deref(),
        )?;

        Ok(VersionResult {
            package_name: query.package_name.clone(),
            package_manager: manager.clone(),
            compatible_versions: resolution.compatible,
            recommended_version: resolution.recommended,
            error: None,
        })
    })
    .await;

    Json(result)
}

/// `GET /supported_package_managers`
pub async fn supported_package_managers(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "supported_package_managers": state.registries.ids() }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgquery_core::CoreError;

    #[tokio::test]
    async fn test_catch_fault_passes_success_through() {
        let result: VersionResult = catch_fault("flask", "pip", async {
            Ok(VersionResult {
                package_name: "flask".into(),
                package_manager: "pip".into(),
                compatible_versions: vec!["1.0.0".into()],
                recommended_version: Some("1.0.0".into()),
                error: None,
            })
        })
        .await;

        assert_eq!(result.error, None);
        assert_eq!(result.compatible_versions, vec!["1.0.0"]);
    }

    #[tokio::test]
    async fn test_catch_fault_reshapes_error() {
        let result: PackageResult = catch_fault("flask", "cargo", async {
            Err(CoreError::UnsupportedRegistry("cargo".into()))
        })
        .await;

        assert_eq!(result.package_name, "flask");
        assert_eq!(result.package_manager, "cargo");
        assert!(result.versions.is_empty());
        assert_eq!(result.latest_version, "");
        assert_eq!(
            result.error.as_deref(),
            Some("unsupported package manager: cargo")
        );
    }

    #[tokio::test]
    async fn test_fault_shapes_default_data_fields() {
        let result = DependencyResult::fault("a", "npm", "boom".into());
        assert!(result.dependencies.is_empty());
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
