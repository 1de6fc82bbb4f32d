//! End-to-end tests for the HTTP surface.
//!
//! Requests go through the real router and handlers; upstream registries
//! are mockito servers. Every endpoint must answer HTTP 200 with the
//! result schema, carrying failures in the `error` field.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pkgquery_core::{HttpClient, RegistryTable};
use pkgquery_npm::NpmRegistry;
use pkgquery_pypi::PypiRegistry;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(pypi_base: &str, npm_base: &str) -> Router {
    let http = Arc::new(HttpClient::new());

    let mut registries = RegistryTable::new();
    registries.register(Arc::new(PypiRegistry::with_base_url(
        Arc::clone(&http),
        pypi_base,
    )));
    registries.register(Arc::new(NpmRegistry::with_base_url(http, npm_base)));

    pkgquery_server::app(Arc::new(registries))
}

async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn pypi_body(name: &str, latest: &str, versions: &[&str]) -> String {
    let releases: Value = versions
        .iter()
        .map(|v| ((*v).to_string(), json!([{ "yanked": false }])))
        .collect::<serde_json::Map<String, Value>>()
        .into();

    json!({
        "info": {
            "name": name,
            "version": latest,
            "summary": "test package",
            "requires_dist": ["requests>=2.0", "click"]
        },
        "releases": releases
    })
    .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app_with("http://unused.invalid", "http://unused.invalid");
    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_supported_package_managers() {
    let app = app_with("http://unused.invalid", "http://unused.invalid");
    let (status, body) = get_json(app, "/supported_package_managers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "supported_package_managers": ["pip", "npm"] }));
}

#[tokio::test]
async fn test_package_info_pip() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/flask/json")
        .with_status(200)
        .with_body(pypi_body("flask", "3.0.0", &["2.3.0", "3.0.0"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "flask", "package_manager": "pip" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["package_name"], "flask");
    assert_eq!(body["latest_version"], "3.0.0");
    assert_eq!(body["versions"], json!(["3.0.0", "2.3.0"]));
    assert_eq!(body["description"], "test package");
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_package_info_unsupported_registry() {
    let app = app_with("http://unused.invalid", "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "serde", "package_manager": "cargo" }),
    )
    .await;

    // A non-fatal result object, never a transport-level failure
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["package_name"], "serde");
    assert_eq!(body["package_manager"], "cargo");
    assert_eq!(body["versions"], json!([]));
    assert_eq!(body["latest_version"], "");
    assert_eq!(body["error"], "unsupported package manager: cargo");
}

#[tokio::test]
async fn test_package_info_registry_selector_is_lowercased() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/flask/json")
        .with_status(200)
        .with_body(pypi_body("flask", "3.0.0", &["3.0.0"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (_, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "flask", "package_manager": "PIP" }),
    )
    .await;

    assert_eq!(body["package_manager"], "pip");
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_package_info_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/missing/json")
        .with_status(404)
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "missing", "package_manager": "pip" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "package not found: missing");
    assert_eq!(body["versions"], json!([]));
}

#[tokio::test]
async fn test_package_info_malformed_upstream_json() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/broken/json")
        .with_status(200)
        .with_body("{ not json")
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "broken", "package_manager": "pip" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().starts_with("JSON error"));
}

#[tokio::test]
async fn test_dependencies_npm_pinned_version() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/express")
        .with_status(200)
        .with_body(
            json!({
                "name": "express",
                "description": "web framework",
                "dist-tags": { "latest": "4.18.2" },
                "versions": {
                    "4.18.2": { "dependencies": { "accepts": "~1.3.8" } },
                    "4.18.1": { "dependencies": { "accepts": "~1.3.7" } }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = app_with("http://unused.invalid", &server.url());
    let (status, body) = post_json(
        app,
        "/dependencies",
        json!({
            "package_name": "express",
            "package_manager": "npm",
            "version": "4.18.1"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dependencies"], json!({ "accepts": "~1.3.7" }));
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_dependencies_pip_latest() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/flask/json")
        .with_status(200)
        .with_body(pypi_body("flask", "3.0.0", &["3.0.0"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (_, body) = post_json(
        app,
        "/dependencies",
        json!({ "package_name": "flask", "package_manager": "pip" }),
    )
    .await;

    assert_eq!(
        body["dependencies"],
        json!({ "requests": ">=2.0", "click": "" })
    );
}

#[tokio::test]
async fn test_compatible_versions_greater_equal() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/demo/json")
        .with_status(200)
        .with_body(pypi_body(
            "demo",
            "2.0.0",
            &["1.0.0", "1.2.0", "1.2.3", "2.0.0"],
        ))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/compatible_versions",
        json!({
            "package_name": "demo",
            "package_manager": "pip",
            "version_constraint": ">=1.2.0"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compatible_versions"], json!(["2.0.0", "1.2.3", "1.2.0"]));
    assert_eq!(body["recommended_version"], "2.0.0");
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_compatible_versions_compatible_release() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/demo")
        .with_status(200)
        .with_body(
            json!({
                "name": "demo",
                "dist-tags": { "latest": "1.5.0" },
                "versions": {
                    "1.4.0": {}, "1.4.2": {}, "1.4.9": {}, "1.5.0": {}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let app = app_with("http://unused.invalid", &server.url());
    let (_, body) = post_json(
        app,
        "/compatible_versions",
        json!({
            "package_name": "demo",
            "package_manager": "npm",
            "version_constraint": "~=1.4.2"
        }),
    )
    .await;

    assert_eq!(
        body["compatible_versions"],
        json!(["1.4.9", "1.4.2", "1.4.0"])
    );
    assert_eq!(body["recommended_version"], "1.4.9");
}

#[tokio::test]
async fn test_compatible_versions_without_constraint_uses_latest() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/demo/json")
        .with_status(200)
        .with_body(pypi_body("demo", "1.2.0", &["1.0.0", "1.2.0", "2.0.0rc1"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (_, body) = post_json(
        app,
        "/compatible_versions",
        json!({ "package_name": "demo", "package_manager": "pip" }),
    )
    .await;

    // Full set, recommendation is the registry-reported latest
    assert_eq!(body["compatible_versions"].as_array().unwrap().len(), 3);
    assert_eq!(body["recommended_version"], "1.2.0");
}

#[tokio::test]
async fn test_compatible_versions_no_match() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/demo/json")
        .with_status(200)
        .with_body(pypi_body("demo", "1.2.0", &["1.0.0", "1.2.0"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (_, body) = post_json(
        app,
        "/compatible_versions",
        json!({
            "package_name": "demo",
            "package_manager": "pip",
            "version_constraint": ">=9.0.0"
        }),
    )
    .await;

    assert_eq!(body["compatible_versions"], json!([]));
    assert!(body["recommended_version"].is_null());
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_compatible_versions_invalid_operator() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/demo/json")
        .with_status(200)
        .with_body(pypi_body("demo", "1.2.0", &["1.0.0", "1.2.0"]))
        .create_async()
        .await;

    let app = app_with(&server.url(), "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/compatible_versions",
        json!({
            "package_name": "demo",
            "package_manager": "pip",
            "version_constraint": "^1.0.0"
        }),
    )
    .await;

    // Typo'd operators are reported, not silently ignored
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "invalid version constraint: ^1.0.0");
    assert_eq!(body["compatible_versions"], json!([]));
}

#[tokio::test]
async fn test_transport_failure_is_a_result_not_a_fault() {
    // Upstream host does not resolve; the error must still come back in
    // the result schema
    let app = app_with("http://invalid.localhost.test", "http://unused.invalid");
    let (status, body) = post_json(
        app,
        "/package_info",
        json!({ "package_name": "flask", "package_manager": "pip" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].as_str().unwrap().contains("registry request failed"));
}
