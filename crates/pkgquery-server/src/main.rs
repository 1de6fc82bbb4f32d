use pkgquery_core::{HttpClient, RegistryTable};
use pkgquery_npm::NpmRegistry;
use pkgquery_pypi::PypiRegistry;
use pkgquery_server::config::ServerConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let http = Arc::new(HttpClient::with_timeout(config.timeout()));

    let mut registries = RegistryTable::new();
    registries.register(Arc::new(PypiRegistry::new(Arc::clone(&http))));
    registries.register(Arc::new(NpmRegistry::new(http)));

    let app = pkgquery_server::app(Arc::new(registries));

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "pkgquery-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
