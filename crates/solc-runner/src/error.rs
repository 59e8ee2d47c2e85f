//! Error types for solc invocation
//!
//! Non-zero exits from an actual compilation are not errors: they come back
//! as a failed [`CompilationResult`](crate::CompilationResult). The variants
//! below cover registry, option, and process-launch failures.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while resolving or running solc
#[derive(Error, Debug, Diagnostic)]
pub enum SolcError {
    /// The requested version key is not one of the supported release lines
    #[error("solc version {version} not supported")]
    #[diagnostic(
        code(solc_runner::version::unsupported),
        help("supported versions are 0.6, 0.7 and 0.8")
    )]
    UnsupportedVersion {
        /// The rejected version key
        version: String,
    },

    /// A list option value cannot be rendered as a command-line token
    #[error("Unexpected type, value '{value}' of option '{option}' cannot be retrieved")]
    #[diagnostic(code(solc_runner::option::unsupported_value))]
    UnsupportedValueType {
        /// Name of the option carrying the value
        option: String,
        /// Lossy rendering of the offending value
        value: String,
    },

    /// The child process could not be spawned
    #[error("failed to start {program}: {source}")]
    #[diagnostic(code(solc_runner::process::start))]
    ProcessStart {
        /// Executable that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The invocation was cancelled before the child finished
    #[error("execution of {program} was interrupted")]
    #[diagnostic(code(solc_runner::process::interrupted))]
    ExecutionInterrupted {
        /// Executable whose run was cancelled
        program: String,
    },

    /// `solc --version` failed or produced output that could not be understood
    #[error("Problem getting solc {version} version: {stderr}")]
    #[diagnostic(code(solc_runner::version::query))]
    VersionQuery {
        /// Version key that was queried
        version: String,
        /// Captured stderr, or a description of the unparsable output
        stderr: String,
    },

    /// I/O error on one of the child's pipes
    #[error("I/O error on {stream}: {source}")]
    #[diagnostic(code(solc_runner::io::stream))]
    StreamIo {
        /// Which pipe failed (`stdin`, `stdout`, `stderr`, or `wait`)
        stream: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Registry configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(solc_runner::config::invalid))]
    Configuration {
        /// Error message describing the configuration problem
        message: String,
    },
}

impl SolcError {
    /// Create an unsupported version error
    #[must_use]
    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            version: version.into(),
        }
    }

    /// Create an unsupported value type error
    #[must_use]
    pub fn unsupported_value_type(option: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedValueType {
            option: option.into(),
            value: value.into(),
        }
    }

    /// Create a process start error
    #[must_use]
    pub fn process_start(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::ProcessStart {
            program: program.into(),
            source,
        }
    }

    /// Create an execution interrupted error
    #[must_use]
    pub fn interrupted(program: impl Into<String>) -> Self {
        Self::ExecutionInterrupted {
            program: program.into(),
        }
    }

    /// Create a version query error
    #[must_use]
    pub fn version_query(version: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::VersionQuery {
            version: version.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a stream I/O error
    #[must_use]
    pub fn stream_io(stream: &'static str, source: std::io::Error) -> Self {
        Self::StreamIo { stream, source }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns true if this error is a cancellation
    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::ExecutionInterrupted { .. })
    }
}

/// Result type for solc operations
pub type Result<T> = std::result::Result<T, SolcError>;
