//! PyPI ecosystem support for pkgquery.
//!
//! Provides the PyPI registry client and the PEP 503 name normalization
//! used when building lookup URLs.

pub mod error;
pub mod registry;

pub use error::{PypiError, Result};
pub use registry::{PypiRegistry, normalize_package_name};
