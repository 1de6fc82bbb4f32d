use serde::Deserialize;
use std::time::Duration;

/// Server configuration.
///
/// Read from environment variables at startup; every field has a default
/// so the service runs with no configuration at all.
///
/// # Examples
///
/// ```
/// use pkgquery_server::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.bind, "127.0.0.1:8311");
/// assert_eq!(config.timeout_secs, 8);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (`PKGQUERY_BIND`).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Outbound registry request timeout in seconds (`PKGQUERY_TIMEOUT_SECS`).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8311".into()
}

fn default_timeout_secs() -> u64 {
    8
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Builds the configuration from environment variables, falling back
    /// to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(bind) = std::env::var("PKGQUERY_BIND") {
            config.bind = bind;
        }
        if let Some(secs) = std::env::var("PKGQUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_secs = secs;
        }

        config
    }

    /// Outbound request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
