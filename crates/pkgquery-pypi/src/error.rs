//! Errors specific to PyPI registry handling.

use pkgquery_core::CoreError;
use thiserror::Error;

/// Errors specific to PyPI registry handling.
#[derive(Error, Debug)]
pub enum PypiError {
    /// Package not found on PyPI
    #[error("package '{package}' not found on PyPI")]
    PackageNotFound { package: String },

    /// PyPI registry request failed
    #[error("PyPI registry request failed for '{package}': {source}")]
    RegistryError {
        package: String,
        #[source]
        source: CoreError,
    },

    /// Failed to deserialize PyPI API response
    #[error("failed to parse PyPI API response for '{package}': {source}")]
    ApiResponseError {
        package: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<PypiError> for CoreError {
    fn from(error: PypiError) -> Self {
        match error {
            PypiError::PackageNotFound { package } => CoreError::PackageNotFound { package },
            PypiError::RegistryError { source, .. } => source,
            PypiError::ApiResponseError { source, .. } => CoreError::Json(source),
        }
    }
}

/// Convenience type alias for `Result<T, PypiError>`.
pub type Result<T> = std::result::Result<T, PypiError>;
