//! Versioned solc invocation
//!
//! This crate runs installed versions of the Solidity compiler as child
//! processes. Source code is streamed to solc's standard input while its
//! standard output and standard error are drained concurrently, so large
//! inputs and outputs never deadlock on full pipe buffers.
//!
//! # Architecture
//!
//! - [`registry`]: lazily resolves and caches one [`ToolHandle`] per
//!   supported [`SolcVersion`]
//! - [`options`]: closed model of the command-line options
//! - [`command`]: construction of the argument vector
//! - [`process`]: spawns solc and handles its pipes
//! - [`compiler`]: [`SolidityCompiler`] ties the pieces together
//!
//! ```text
//! compile(source, "0.8", options)
//!     ↓
//! ToolRegistry::resolve("0.8")      → ToolHandle (cached)
//!     ↓
//! command::build(handle, options)   → [solc, --combined-json, abi,bin, -]
//!     ↓
//! ProcessRunner::execute(spec, source)
//!     ↓
//! CompilationResult { errors, output, success }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use solc_runner::{Options, SolidityCompiler, ToolRegistry};
//! use std::sync::Arc;
//!
//! # async fn run() -> solc_runner::Result<()> {
//! let registry = ToolRegistry::builder().install_root("/opt/solc").build()?;
//! let compiler = SolidityCompiler::new(Arc::new(registry));
//!
//! let source = b"pragma solidity ^0.8.0; contract A {}";
//! let result = compiler
//!     .compile(source, "0.8", true, &[Options::ABI, Options::BIN])
//!     .await?;
//!
//! if result.is_failed() {
//!     eprintln!("{}", result.errors);
//! } else {
//!     println!("{}", result.output);
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod compiler;
pub mod config;
pub mod error;
pub mod handle;
pub mod options;
pub mod process;
pub mod registry;
pub mod version;

pub use command::CommandSpec;
pub use compiler::{CompilationResult, CompileRequest, SolidityCompiler};
pub use config::RegistryConfig;
pub use error::{Result, SolcError};
pub use handle::ToolHandle;
pub use options::{ListValue, OutputSelection, Options, SolcOption};
pub use process::{ProcessOutput, ProcessRunner};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use version::SolcVersion;

/// Compile with the process-wide registry (see [`ToolRegistry::global`])
///
/// # Errors
///
/// See [`SolidityCompiler::compile`]
pub async fn compile(
    source: &[u8],
    version: &str,
    combined_json: bool,
    options: &[SolcOption],
) -> Result<CompilationResult> {
    SolidityCompiler::global()
        .compile(source, version, combined_json, options)
        .await
}

/// `solc --version` output from the process-wide registry
///
/// # Errors
///
/// See [`SolidityCompiler::get_version`]
pub async fn get_version(version: &str) -> Result<String> {
    SolidityCompiler::global().get_version(version).await
}
