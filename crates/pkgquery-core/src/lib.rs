//! Core abstractions for pkgquery.
//!
//! This crate provides everything shared by the registry-specific crates
//! and the HTTP surface:
//!
//! - **Version resolution**: a lenient semantic-version comparator
//!   ([`Version`]), single-operator constraints ([`Constraint`]), and the
//!   pure [`resolver::resolve`] function that filters and ranks candidate
//!   versions.
//! - **Registry abstraction**: the [`Registry`] trait each upstream client
//!   implements, plus the immutable [`RegistryTable`] built at startup.
//! - **HTTP client**: a shared, timeout-bounded [`HttpClient`] with no
//!   response caching.
//! - **Errors**: the unified [`CoreError`] type.

pub mod constraint;
pub mod error;
pub mod http;
pub mod registry;
pub mod resolver;
pub mod version;

// Re-export commonly used types
pub use constraint::{Constraint, Op};
pub use error::{CoreError, Result};
pub use http::{DEFAULT_TIMEOUT, HttpClient};
pub use registry::{PackageInfo, Registry, RegistryTable};
pub use resolver::{Resolution, resolve};
pub use version::{Version, compare_versions};
