//! Resolved solc installations

use crate::version::SolcVersion;
use std::path::{Path, PathBuf};

/// Environment variable pointing the dynamic loader at the install directory
#[cfg(target_os = "macos")]
pub const LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";

/// Environment variable pointing the dynamic loader at the install directory
#[cfg(not(target_os = "macos"))]
pub const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// One installation of solc for a given release line.
///
/// Handles are plain descriptors: the executable is only checked when a
/// process is spawned from it. A handle created before the executable
/// existed keeps its absolute, non-canonical path; command building
/// resolves it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    version: SolcVersion,
    executable: PathBuf,
    directory: PathBuf,
}

impl ToolHandle {
    /// Create a handle for `executable`.
    ///
    /// The path is canonicalized when it exists; otherwise it is made
    /// absolute against the current directory so that the working directory
    /// change on spawn cannot change its meaning.
    #[must_use]
    pub fn new(version: SolcVersion, executable: impl AsRef<Path>) -> Self {
        let executable = executable.as_ref();
        let resolved = std::fs::canonicalize(executable)
            .or_else(|_| std::path::absolute(executable))
            .unwrap_or_else(|_| executable.to_path_buf());

        let directory = resolved
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        tracing::debug!(
            version = %version,
            executable = %resolved.display(),
            "Created solc handle"
        );

        Self {
            version,
            executable: resolved,
            directory,
        }
    }

    /// Release line this handle serves
    #[must_use]
    pub const fn version(&self) -> SolcVersion {
        self.version
    }

    /// Absolute path of the solc executable
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Directory containing the executable; used as working directory and
    /// library search path
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_executable_is_canonicalized() {
        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("solc");
        std::fs::write(&bin, "").unwrap();

        let handle = ToolHandle::new(SolcVersion::V0_8, &bin);
        let canonical = std::fs::canonicalize(&bin).unwrap();
        assert_eq!(handle.executable(), canonical);
        assert_eq!(handle.directory(), canonical.parent().unwrap());
        assert_eq!(handle.version(), SolcVersion::V0_8);
    }

    #[test]
    fn test_missing_executable_is_made_absolute() {
        let handle = ToolHandle::new(SolcVersion::V0_6, "not-installed/0.6/solc");
        assert!(handle.executable().is_absolute());
        assert!(handle.executable().ends_with("not-installed/0.6/solc"));
        assert!(handle.directory().ends_with("not-installed/0.6"));
    }
}
