//! Per-version cache of solc handles

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::handle::ToolHandle;
use crate::version::SolcVersion;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};

static GLOBAL: LazyLock<Arc<ToolRegistry>> =
    LazyLock::new(|| Arc::new(ToolRegistry::with_config(RegistryConfig::from_env())));

/// Lazily constructs and caches one [`ToolHandle`] per supported version.
///
/// Each version has its own `OnceLock` slot, so concurrent first use of a
/// key runs the constructor exactly once and every caller gets the same
/// `Arc`.
#[derive(Debug)]
pub struct ToolRegistry {
    config: RegistryConfig,
    slots: [OnceLock<Arc<ToolHandle>>; SolcVersion::ALL.len()],
    constructed: AtomicUsize,
}

impl ToolRegistry {
    /// Create a registry from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names unsupported versions
    pub fn new(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Create a builder
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Process-wide registry configured from the environment
    /// (see [`RegistryConfig::from_env`])
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            slots: Default::default(),
            constructed: AtomicUsize::new(0),
        }
    }

    /// Resolve a version key to its handle
    ///
    /// # Errors
    ///
    /// Returns [`SolcError::UnsupportedVersion`](crate::SolcError::UnsupportedVersion)
    /// if `version` is not a supported key; no handle is constructed in that case
    pub fn resolve(&self, version: &str) -> Result<Arc<ToolHandle>> {
        let version: SolcVersion = version.parse()?;
        Ok(self.resolve_version(version))
    }

    /// Resolve an already-parsed version
    #[must_use]
    pub fn resolve_version(&self, version: SolcVersion) -> Arc<ToolHandle> {
        let handle = self.slots[version.index()].get_or_init(|| {
            self.constructed.fetch_add(1, Ordering::Relaxed);
            Arc::new(ToolHandle::new(version, self.config.executable_for(version)))
        });
        Arc::clone(handle)
    }

    /// Number of handles constructed so far
    #[must_use]
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::Relaxed)
    }

    /// Configuration this registry resolves against
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

/// Builder for [`ToolRegistry`]
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    config: RegistryConfig,
}

impl ToolRegistryBuilder {
    /// Start from an existing configuration
    #[must_use]
    pub const fn from_config(config: RegistryConfig) -> Self {
        Self { config }
    }

    /// Set the install root
    #[must_use]
    pub fn install_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.install_root = Some(root.into());
        self
    }

    /// Use a specific executable for one version
    #[must_use]
    pub fn executable(mut self, version: SolcVersion, path: impl Into<PathBuf>) -> Self {
        self.config
            .executables
            .insert(version.as_str().to_string(), path.into());
        self
    }

    /// Build the registry
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration names unsupported versions
    pub fn build(self) -> Result<ToolRegistry> {
        ToolRegistry::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolcError;
    use std::thread;

    fn registry() -> ToolRegistry {
        ToolRegistry::builder()
            .install_root("/opt/solc-test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_is_cached() {
        let registry = registry();
        let first = registry.resolve("0.8").unwrap();
        let second = registry.resolve("0.8").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.constructed(), 1);
    }

    #[test]
    fn test_each_version_gets_its_own_handle() {
        let registry = registry();
        let handles: Vec<_> = SolcVersion::ALL
            .into_iter()
            .map(|v| registry.resolve_version(v))
            .collect();
        assert_eq!(registry.constructed(), 3);
        assert!(handles[0].executable().starts_with("/opt/solc-test/0.6"));
        assert!(handles[1].executable().starts_with("/opt/solc-test/0.7"));
        assert!(handles[2].executable().starts_with("/opt/solc-test/0.8"));
    }

    #[test]
    fn test_unsupported_version_constructs_nothing() {
        let registry = registry();
        let err = registry.resolve("0.4").unwrap_err();
        assert!(matches!(err, SolcError::UnsupportedVersion { .. }));
        assert_eq!(registry.constructed(), 0);
    }

    #[test]
    fn test_concurrent_first_use_constructs_once() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = thread::scope(|scope| {
            let workers: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| registry.resolve("0.7").unwrap()))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(registry.constructed(), 1);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn test_builder_rejects_bad_override_key() {
        let mut config = RegistryConfig::default();
        config
            .executables
            .insert("1.0".to_string(), PathBuf::from("/bin/solc"));
        assert!(ToolRegistryBuilder::from_config(config).build().is_err());
    }

    #[test]
    fn test_builder_executable_override() {
        let registry = ToolRegistry::builder()
            .install_root("/opt/solc-test")
            .executable(SolcVersion::V0_6, "/elsewhere/solc-0.6.12")
            .build()
            .unwrap();
        let handle = registry.resolve("0.6").unwrap();
        assert!(handle.executable().ends_with("solc-0.6.12"));
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&ToolRegistry::global(), &ToolRegistry::global()));
    }
}
