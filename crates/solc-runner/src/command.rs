//! Argument vector construction
//!
//! Token order, as expected by solc:
//!
//! ```text
//! <exe> [--optimize] [--version] (--combined-json <csv> | --<selection>...)
//!       (--<list> <csv>)... (--<custom> [value])... -
//! ```

use crate::error::Result;
use crate::handle::{LIBRARY_PATH_VAR, ToolHandle};
use crate::options::{Flag, OutputSelection, SolcOption};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Flag that folds output selections into one value
pub const COMBINED_JSON: &str = "--combined-json";

/// Tells solc to read its source from standard input
pub const STDIN_MARKER: &str = "-";

/// Fully resolved invocation of solc
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable to run (argv\[0\])
    pub program: PathBuf,
    /// Arguments after the executable
    pub args: Vec<String>,
    /// Working directory for the child
    pub current_dir: PathBuf,
    /// Variables added to the inherited environment
    pub env: Vec<(String, OsString)>,
}

impl CommandSpec {
    /// The handle may predate the installation, so the executable is
    /// canonicalized again here; a symlinked install then runs from the
    /// directory of its target.
    fn for_handle(handle: &ToolHandle, args: Vec<String>) -> Self {
        let (program, current_dir) = match std::fs::canonicalize(handle.executable()) {
            Ok(program) => {
                let dir = program
                    .parent()
                    .map_or_else(|| handle.directory().to_path_buf(), Path::to_path_buf);
                (program, dir)
            }
            Err(_) => (
                handle.executable().to_path_buf(),
                handle.directory().to_path_buf(),
            ),
        };

        Self {
            env: vec![(
                LIBRARY_PATH_VAR.to_string(),
                current_dir.as_os_str().to_os_string(),
            )],
            program,
            args,
            current_dir,
        }
    }

    /// Program followed by its arguments, lossily converted for display
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Program name for logs and error messages
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Build the command for compiling source read from standard input.
///
/// Output selections are collected in the order supplied. With
/// `combined_json` they become one `--combined-json a,b` pair (an empty list
/// is passed through and left for solc to judge); otherwise each renders as
/// its own flag. A `Flag::Optimize` among `options` has the same effect as
/// `optimize`.
///
/// # Errors
///
/// Returns [`SolcError::UnsupportedValueType`](crate::SolcError::UnsupportedValueType)
/// if a list value cannot be rendered
pub fn build(
    handle: &ToolHandle,
    optimize: bool,
    combined_json: bool,
    options: &[SolcOption],
) -> Result<CommandSpec> {
    let mut args = Vec::new();

    let flags: Vec<Flag> = options
        .iter()
        .filter_map(|option| match option {
            SolcOption::Flag(flag) => Some(*flag),
            _ => None,
        })
        .collect();

    if optimize || flags.contains(&Flag::Optimize) {
        args.push(Flag::Optimize.token());
    }
    if flags.contains(&Flag::Version) {
        args.push(Flag::Version.token());
    }

    let selections: Vec<OutputSelection> = options
        .iter()
        .filter_map(|option| match option {
            SolcOption::Output(selection) => Some(*selection),
            _ => None,
        })
        .collect();

    if combined_json {
        let joined = selections
            .iter()
            .map(|selection| selection.name())
            .collect::<Vec<_>>()
            .join(",");
        args.push(COMBINED_JSON.to_string());
        args.push(joined);
    } else {
        args.extend(selections.iter().map(|selection| format!("--{selection}")));
    }

    for option in options {
        if matches!(option, SolcOption::List { .. }) {
            args.extend(option.render()?);
        }
    }

    for option in options {
        if matches!(option, SolcOption::Custom { .. }) {
            args.extend(option.render()?);
        }
    }

    args.push(STDIN_MARKER.to_string());

    Ok(CommandSpec::for_handle(handle, args))
}

/// Build `solc --version`
#[must_use]
pub fn build_version_query(handle: &ToolHandle) -> CommandSpec {
    CommandSpec::for_handle(handle, vec![Flag::Version.token()])
}
