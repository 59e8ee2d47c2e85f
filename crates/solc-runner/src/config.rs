//! Registry configuration
//!
//! Installations live under an install root, one directory per release line:
//!
//! ```text
//! {install_root}/0.6/solc
//! {install_root}/0.7/solc
//! {install_root}/0.8/solc
//! ```
//!
//! Individual executables can be overridden per version. Collaborators that
//! keep their settings in a file can deserialize [`RegistryConfig`] directly.

use crate::error::{Result, SolcError};
use crate::version::SolcVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Environment variable overriding the install root
pub const HOME_ENV: &str = "SOLC_RUNNER_HOME";

/// Prefix of per-version executable overrides, e.g. `SOLC_RUNNER_SOLC_0_8`
pub const EXECUTABLE_ENV_PREFIX: &str = "SOLC_RUNNER_SOLC_";

#[cfg(windows)]
const BINARY_NAME: &str = "solc.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "solc";

/// Where to find solc installations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Root directory holding one subdirectory per release line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,
    /// Explicit executables keyed by version key (`"0.8"` etc.)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub executables: BTreeMap<String, PathBuf>,
}

impl RegistryConfig {
    /// Build a configuration from `SOLC_RUNNER_HOME` and
    /// `SOLC_RUNNER_SOLC_<major>_<minor>` variables. Empty values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let install_root = non_empty_var(HOME_ENV).map(PathBuf::from);

        let executables = SolcVersion::ALL
            .into_iter()
            .filter_map(|version| {
                let var = format!("{EXECUTABLE_ENV_PREFIX}{}", version.env_suffix());
                non_empty_var(&var).map(|path| (version.as_str().to_string(), PathBuf::from(path)))
            })
            .collect();

        Self {
            install_root,
            executables,
        }
    }

    /// Check that every override names a supported version
    ///
    /// # Errors
    ///
    /// Returns [`SolcError::Configuration`] for override keys outside the
    /// supported set
    pub fn validate(&self) -> Result<()> {
        for key in self.executables.keys() {
            if key.parse::<SolcVersion>().is_err() {
                return Err(SolcError::configuration(format!(
                    "executable override for unsupported solc version '{key}'"
                )));
            }
        }
        Ok(())
    }

    /// Install root in effect: the configured one, or the platform data
    /// directory (`~/.local/share/solc-runner/solc` on Linux)
    #[must_use]
    pub fn effective_install_root(&self) -> PathBuf {
        self.install_root.clone().unwrap_or_else(default_install_root)
    }

    /// Path of the executable serving `version`
    #[must_use]
    pub fn executable_for(&self, version: SolcVersion) -> PathBuf {
        self.executables.get(version.as_str()).cloned().unwrap_or_else(|| {
            self.effective_install_root()
                .join(version.as_str())
                .join(BINARY_NAME)
        })
    }
}

fn default_install_root() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("solc"),
        |base| base.join("solc-runner").join("solc"),
    )
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
