use thiserror::Error;

/// Core error types for pkgquery.
///
/// Every failure a registry lookup or a constraint resolution can hit is
/// represented here. The HTTP surface converts these into the `error` field
/// of its result schema; nothing escapes an endpoint as a fault.
///
/// # Examples
///
/// ```
/// use pkgquery_core::error::{CoreError, Result};
///
/// fn lookup(registry: &str) -> Result<()> {
///     if registry != "pip" && registry != "npm" {
///         return Err(CoreError::UnsupportedRegistry(registry.into()));
///     }
///     Ok(())
/// }
///
/// assert!(lookup("cargo").is_err());
/// ```
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("registry request failed for {package}: {source}")]
    RegistryError {
        package: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("package not found: {package}")]
    PackageNotFound { package: String },

    #[error("registry returned HTTP {status} for {url}")]
    RegistryStatus { url: String, status: u16 },

    #[error("unsupported package manager: {0}")]
    UnsupportedRegistry(String),

    #[error("invalid version constraint: {0}")]
    InvalidConstraint(String),

    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for `Result<T, CoreError>`.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_registry_display() {
        let error = CoreError::UnsupportedRegistry("cargo".into());
        assert_eq!(error.to_string(), "unsupported package manager: cargo");
    }

    #[test]
    fn test_package_not_found_display() {
        let error = CoreError::PackageNotFound {
            package: "left-pad".into(),
        };
        assert_eq!(error.to_string(), "package not found: left-pad");
    }

    #[test]
    fn test_invalid_constraint_display() {
        let error = CoreError::InvalidConstraint("^^1.0".into());
        assert_eq!(error.to_string(), "invalid version constraint: ^^1.0");
    }

    #[test]
    fn test_registry_status_display() {
        let error = CoreError::RegistryStatus {
            url: "https://pypi.org/pypi/flask/json".into(),
            status: 503,
        };
        assert!(error.to_string().contains("503"));
    }
}
