//! Typed solc command-line options
//!
//! Every option is one variant of [`SolcOption`]. Output selections are the
//! only variant whose rendering depends on the invocation: in combined-output
//! mode they are folded into a single `--combined-json` value by the command
//! builder instead of rendering on their own.

use crate::error::{Result, SolcError};
use std::fmt;
use std::path::PathBuf;

/// Name-only flags driven by the builder and facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `--optimize`
    Optimize,
    /// `--version`
    Version,
}

impl Flag {
    /// Flag name without the leading dashes
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Optimize => "optimize",
            Self::Version => "version",
        }
    }

    /// The flag as a single command-line token
    #[must_use]
    pub fn token(self) -> String {
        format!("--{}", self.name())
    }
}

/// Output artifacts solc can be asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSelection {
    /// AST of all source files
    Ast,
    /// Hex-encoded binary
    Bin,
    /// Solidity interface
    Interface,
    /// Contract ABI
    Abi,
    /// Combined metadata JSON
    Metadata,
    /// AST of all source files in JSON format
    AstJson,
}

impl OutputSelection {
    /// Selection name as understood by solc
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ast => "ast",
            Self::Bin => "bin",
            Self::Interface => "interface",
            Self::Abi => "abi",
            Self::Metadata => "metadata",
            Self::AstJson => "ast-json",
        }
    }
}

impl fmt::Display for OutputSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value of a list option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListValue {
    /// Filesystem path, rendered as an absolute path
    Path(PathBuf),
    /// Plain text, rendered verbatim
    Text(String),
}

impl ListValue {
    fn render(&self, option: &str) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Path(path) => {
                // An empty path names the current directory.
                let absolute = if path.as_os_str().is_empty() {
                    std::env::current_dir()
                } else {
                    std::path::absolute(path)
                }
                .unwrap_or_else(|_| path.clone());
                absolute.into_os_string().into_string().map_err(|raw| {
                    SolcError::unsupported_value_type(option, raw.to_string_lossy())
                })
            }
        }
    }
}

impl From<PathBuf> for ListValue {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&std::path::Path> for ListValue {
    fn from(path: &std::path::Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<String> for ListValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ListValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A single contribution to the solc command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolcOption {
    /// Bare `--name` flag
    Flag(Flag),
    /// Output artifact selection
    Output(OutputSelection),
    /// `--name v1,v2,...`
    List {
        /// Option name without leading dashes
        name: String,
        /// Values in render order
        values: Vec<ListValue>,
    },
    /// Caller-defined option, `--name` or `--name value`
    Custom {
        /// Option name without leading dashes
        name: String,
        /// Optional value token
        value: Option<String>,
    },
}

impl SolcOption {
    /// List option with the given name and values
    #[must_use]
    pub fn list<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ListValue>,
    {
        Self::List {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Custom option; a leading `--` in `name` is stripped
    #[must_use]
    pub fn custom(name: impl AsRef<str>, value: Option<String>) -> Self {
        let name = name.as_ref();
        Self::Custom {
            name: name.strip_prefix("--").unwrap_or(name).to_string(),
            value,
        }
    }

    /// Option name without leading dashes
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Flag(flag) => flag.name(),
            Self::Output(selection) => selection.name(),
            Self::List { name, .. } | Self::Custom { name, .. } => name.as_str(),
        }
    }

    /// Render this option as stand-alone command-line tokens.
    ///
    /// Output selections render as `--name` here; the command builder
    /// folds them into `--combined-json` instead when combined output is on.
    ///
    /// # Errors
    ///
    /// Returns [`SolcError::UnsupportedValueType`] if a list value cannot be
    /// turned into a UTF-8 token
    pub fn render(&self) -> Result<Vec<String>> {
        match self {
            Self::Flag(flag) => Ok(vec![flag.token()]),
            Self::Output(selection) => Ok(vec![format!("--{selection}")]),
            Self::List { name, values } => {
                let rendered = values
                    .iter()
                    .map(|value| value.render(name))
                    .collect::<Result<Vec<_>>>()?;
                Ok(vec![format!("--{name}"), rendered.join(",")])
            }
            Self::Custom { name, value } => {
                let mut tokens = vec![format!("--{name}")];
                tokens.extend(value.iter().cloned());
                Ok(tokens)
            }
        }
    }
}

impl From<OutputSelection> for SolcOption {
    fn from(selection: OutputSelection) -> Self {
        Self::Output(selection)
    }
}

/// Catalogue of the public options
pub struct Options;

impl Options {
    /// `ast` output
    pub const AST: SolcOption = SolcOption::Output(OutputSelection::Ast);
    /// `bin` output
    pub const BIN: SolcOption = SolcOption::Output(OutputSelection::Bin);
    /// `interface` output
    pub const INTERFACE: SolcOption = SolcOption::Output(OutputSelection::Interface);
    /// `abi` output
    pub const ABI: SolcOption = SolcOption::Output(OutputSelection::Abi);
    /// `metadata` output
    pub const METADATA: SolcOption = SolcOption::Output(OutputSelection::Metadata);
    /// `ast-json` output
    pub const ASTJSON: SolcOption = SolcOption::Output(OutputSelection::AstJson);

    /// `--allow-paths p1,p2,...`
    #[must_use]
    pub fn allow_paths<I, V>(values: I) -> SolcOption
    where
        I: IntoIterator<Item = V>,
        V: Into<ListValue>,
    {
        SolcOption::list("allow-paths", values)
    }

    /// Custom flag without a value
    #[must_use]
    pub fn custom(name: impl AsRef<str>) -> SolcOption {
        SolcOption::custom(name, None)
    }

    /// Custom option with a value
    #[must_use]
    pub fn custom_with_value(name: impl AsRef<str>, value: impl Into<String>) -> SolcOption {
        SolcOption::custom(name, Some(value.into()))
    }
}
