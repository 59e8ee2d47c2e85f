//! Fake solc installations for integration tests

#![allow(dead_code)]

use solc_runner::{SolcVersion, SolidityCompiler, ToolRegistry};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Behaves like solc for the flags the tests use.
///
/// `--version` prints a version banner. Otherwise the last argument must be
/// `-`; the source is read from stdin and accepted if it carries a pragma.
/// Accepted runs echo the received arguments, working directory, and
/// library path so tests can inspect the process boundary.
pub const FAKE_SOLC: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "solc, the solidity compiler commandline interface"
  echo "Version: 0.8.19+commit.7dd6d404.Linux.g++"
  exit 0
fi
last=""
for arg in "$@"; do last="$arg"; done
if [ "$last" != "-" ]; then
  echo "No input files given. If you wish to use the standard input please specify \"-\" explicitly." >&2
  exit 1
fi
src=$(cat)
case "$src" in
  *"pragma solidity"*) ;;
  *)
    echo "Error: Expected pragma, import directive or contract/interface/library/struct/enum/constant/function definition." >&2
    exit 1
    ;;
esac
echo "{\"contracts\":{\"<stdin>:A\":{\"abi\":\"[]\",\"bin\":\"6080\"}},\"version\":\"0.8.19\"}"
echo "args: $*"
echo "cwd: $(pwd)"
echo "libpath: $LD_LIBRARY_PATH"
"#;

/// Copies stdin to both stdout and stderr as it arrives
pub const ECHO_BOTH: &str = "#!/bin/sh\nexec tee /dev/stderr\n";

/// Ignores its input and blocks
pub const SLEEPER: &str = "#!/bin/sh\nexec sleep 30\n";

/// Fails immediately without reading stdin
pub const EARLY_FAILURE: &str = "#!/bin/sh\necho \"Error: license missing\" >&2\nexit 1\n";

/// Write an executable script
pub fn write_script(path: &Path, body: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

/// An install root with one script per listed version
pub struct FakeInstall {
    pub root: TempDir,
    pub registry: Arc<ToolRegistry>,
}

impl FakeInstall {
    pub fn new(scripts: &[(SolcVersion, &str)]) -> Self {
        let root = TempDir::new().unwrap();
        for (version, body) in scripts {
            write_script(&Self::script_path(root.path(), *version), body);
        }

        let registry = ToolRegistry::builder()
            .install_root(root.path())
            .build()
            .unwrap();

        Self {
            root,
            registry: Arc::new(registry),
        }
    }

    /// Every supported version backed by [`FAKE_SOLC`]
    pub fn all_fake() -> Self {
        let scripts: Vec<_> = SolcVersion::ALL
            .into_iter()
            .map(|version| (version, FAKE_SOLC))
            .collect();
        Self::new(&scripts)
    }

    pub fn script_path(root: &Path, version: SolcVersion) -> PathBuf {
        root.join(version.as_str()).join("solc")
    }

    pub fn compiler(&self) -> SolidityCompiler {
        SolidityCompiler::new(Arc::clone(&self.registry))
    }
}

pub const VALID_SOURCE: &[u8] = b"pragma solidity ^0.8.0;\n\ncontract A {\n    uint256 public x;\n}\n";

pub const INVALID_SOURCE: &[u8] = b"contract A {\n    uint256 public x\n";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
