//! HTTP surface for pkgquery.
//!
//! Proxies package queries to the supported registries and normalizes
//! their responses into a uniform result schema. Endpoints:
//!
//! - `POST /package_info` - versions, latest version, description
//! - `POST /dependencies` - declared dependencies of a version
//! - `POST /compatible_versions` - constraint-filtered versions plus a
//!   recommendation
//! - `GET /supported_package_managers` - capability listing
//! - `GET /health` - liveness check
//!
//! Each request issues at most one outbound registry call; there is no
//! caching and no shared mutable state between requests.

pub mod config;
pub mod handlers;
pub mod schema;

use axum::Router;
use axum::routing::{get, post};
use pkgquery_core::RegistryTable;
use std::sync::Arc;

/// Shared, read-only request state: the registry table built at startup.
#[derive(Clone)]
pub struct AppState {
    pub registries: Arc<RegistryTable>,
}

/// Builds the router over an already-populated registry table.
pub fn app(registries: Arc<RegistryTable>) -> Router {
    Router::new()
        .route("/package_info", post(handlers::package_info))
        .route("/dependencies", post(handlers::dependencies))
        .route("/compatible_versions", post(handlers::compatible_versions))
        .route(
            "/supported_package_managers",
            get(handlers::supported_package_managers),
        )
        .route("/health", get(handlers::health))
        .with_state(AppState { registries })
}
