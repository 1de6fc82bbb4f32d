//! npm ecosystem support for pkgquery.

pub mod registry;

pub use registry::NpmRegistry;
