use crate::error::{CoreError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Normalized package information, identical in shape for every registry.
///
/// Each registry client maps its upstream JSON into this struct so the
/// layers above never see registry-specific response shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package name as reported by the registry.
    pub name: String,
    /// All known versions, sorted newest-first.
    pub versions: Vec<String>,
    /// The registry's own notion of the latest version.
    pub latest_version: String,
    /// Short description, when the registry provides one.
    pub description: Option<String>,
}

/// A package registry the service can proxy queries to.
///
/// Implementors fetch and normalize upstream responses. All methods return
/// `Result` so the HTTP surface can convert failures into its
/// result-carries-error schema; implementations must never panic on
/// upstream data.
///
/// # Examples
///
/// ```no_run
/// use pkgquery_core::{PackageInfo, Registry};
/// use async_trait::async_trait;
/// use std::collections::BTreeMap;
///
/// struct FixtureRegistry;
///
/// #[async_trait]
/// impl Registry for FixtureRegistry {
///     fn id(&self) -> &'static str {
///         "fixture"
///     }
///
///     async fn package_info(&self, name: &str) -> pkgquery_core::error::Result<PackageInfo> {
///         Ok(PackageInfo {
///             name: name.to_string(),
///             versions: vec!["1.0.0".into()],
///             latest_version: "1.0.0".into(),
///             description: None,
///         })
///     }
///
///     async fn dependencies(
///         &self,
///         _name: &str,
///         _version: Option<&str>,
///     ) -> pkgquery_core::error::Result<BTreeMap<String, String>> {
///         Ok(BTreeMap::new())
///     }
/// }
/// ```
#[async_trait]
pub trait Registry: Send + Sync {
    /// Registry selector used in requests (e.g., "pip", "npm").
    fn id(&self) -> &'static str;

    /// Fetches normalized package information.
    ///
    /// # Errors
    ///
    /// Returns error if the package does not exist, the network request
    /// fails, or the upstream response cannot be parsed.
    async fn package_info(&self, name: &str) -> Result<PackageInfo>;

    /// Fetches the declared dependencies of a package version as a map
    /// from dependency name to its raw constraint string.
    ///
    /// `version` of `None` means the latest version. A version the
    /// registry does not know yields an empty map, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the package does not exist, the network request
    /// fails, or the upstream response cannot be parsed.
    async fn dependencies(
        &self,
        name: &str,
        version: Option<&str>,
    ) -> Result<BTreeMap<String, String>>;
}

impl std::fmt::Debug for dyn Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("id", &self.id()).finish()
    }
}

/// Immutable table of supported registries.
///
/// Built once at process start and shared read-only across request
/// handlers. Lookups are by lowercased selector.
///
/// # Examples
///
/// ```
/// use pkgquery_core::RegistryTable;
///
/// let table = RegistryTable::new();
/// // table.register(Arc::new(PypiRegistry::new(http.clone())));
/// // table.register(Arc::new(NpmRegistry::new(http)));
///
/// for id in table.ids() {
///     println!("supported: {id}");
/// }
/// ```
#[derive(Default)]
pub struct RegistryTable {
    registries: Vec<Arc<dyn Registry>>,
}

impl RegistryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registry. Intended to be called only during startup, before
    /// the table is shared.
    pub fn register(&mut self, registry: Arc<dyn Registry>) {
        self.registries.push(registry);
    }

    /// Looks up a registry by selector.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnsupportedRegistry` for unknown selectors.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Registry>> {
        self.registries
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| CoreError::UnsupportedRegistry(id.to_string()))
    }

    /// Registry selectors in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.registries.iter().map(|r| r.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubRegistry {
        id: &'static str,
    }

    #[async_trait]
    impl Registry for StubRegistry {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn package_info(&self, name: &str) -> Result<PackageInfo> {
            Ok(PackageInfo {
                name: name.to_string(),
                versions: vec!["1.0.0".into()],
                latest_version: "1.0.0".into(),
                description: Some("stub".into()),
            })
        }

        async fn dependencies(
            &self,
            _name: &str,
            _version: Option<&str>,
        ) -> Result<BTreeMap<String, String>> {
            Ok(BTreeMap::new())
        }
    }

    #[test]
    fn test_empty_table() {
        let table = RegistryTable::new();
        assert!(table.ids().is_empty());
        assert!(table.get("pip").is_err());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut table = RegistryTable::new();
        table.register(Arc::new(StubRegistry { id: "pip" }));
        table.register(Arc::new(StubRegistry { id: "npm" }));

        assert_eq!(table.ids(), vec!["pip", "npm"]);
        assert_eq!(table.get("pip").unwrap().id(), "pip");
    }

    #[test]
    fn test_unknown_selector_is_unsupported() {
        let mut table = RegistryTable::new();
        table.register(Arc::new(StubRegistry { id: "pip" }));

        let error = table.get("cargo").unwrap_err();
        assert!(matches!(error, CoreError::UnsupportedRegistry(s) if s == "cargo"));
    }

    #[tokio::test]
    async fn test_stub_round_trip() {
        let registry = StubRegistry { id: "pip" };
        let info = registry.package_info("flask").await.unwrap();
        assert_eq!(info.name, "flask");
        assert_eq!(info.latest_version, "1.0.0");
    }
}
