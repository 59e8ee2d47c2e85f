//! Compilation entry points

use crate::command;
use crate::error::{Result, SolcError};
use crate::options::SolcOption;
use crate::process::ProcessRunner;
use crate::registry::ToolRegistry;
use crate::version::{SolcVersion, parse_version_output};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Outcome of one compilation.
///
/// A failed compilation is a normal outcome: `success` is false and
/// `errors` holds solc's diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResult {
    /// Captured stderr
    pub errors: String,
    /// Captured stdout
    pub output: String,
    /// True iff solc exited with code zero
    pub success: bool,
}

impl CompilationResult {
    /// Create a result
    #[must_use]
    pub fn new(errors: impl Into<String>, output: impl Into<String>, success: bool) -> Self {
        Self {
            errors: errors.into(),
            output: output.into(),
            success,
        }
    }

    /// Shorthand for `!success`
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        !self.success
    }
}

/// One compilation, configured step by step
#[derive(Debug, Clone)]
pub struct CompileRequest {
    source: Vec<u8>,
    version: String,
    combined_json: bool,
    optimize: bool,
    options: Vec<SolcOption>,
    cancel: Option<CancellationToken>,
}

impl CompileRequest {
    /// Compile `source` with the given version key
    #[must_use]
    pub fn new(source: impl Into<Vec<u8>>, version: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            version: version.into(),
            combined_json: false,
            optimize: false,
            options: Vec::new(),
            cancel: None,
        }
    }

    /// Fold output selections into `--combined-json`
    #[must_use]
    pub const fn combined_json(mut self, enabled: bool) -> Self {
        self.combined_json = enabled;
        self
    }

    /// Pass `--optimize`
    #[must_use]
    pub const fn optimize(mut self, enabled: bool) -> Self {
        self.optimize = enabled;
        self
    }

    /// Add one option
    #[must_use]
    pub fn option(mut self, option: impl Into<SolcOption>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Add several options, keeping their order
    #[must_use]
    pub fn options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = SolcOption>,
    {
        self.options.extend(options);
        self
    }

    /// Abort the run when `token` is cancelled
    #[must_use]
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Compiles Solidity sources with the installation registered for a version
#[derive(Debug, Clone)]
pub struct SolidityCompiler {
    registry: Arc<ToolRegistry>,
}

impl SolidityCompiler {
    /// Compiler backed by an explicit registry
    #[must_use]
    pub const fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Compiler backed by [`ToolRegistry::global`]
    #[must_use]
    pub fn global() -> Self {
        Self::new(ToolRegistry::global())
    }

    /// Registry this compiler resolves versions against
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Compile `source` read from stdin. `--optimize` is not passed; use
    /// [`compile_request`](Self::compile_request) to enable it.
    ///
    /// # Errors
    ///
    /// - [`SolcError::UnsupportedVersion`] for unknown version keys
    /// - [`SolcError::UnsupportedValueType`] for unrenderable list values
    /// - [`SolcError::ProcessStart`] if solc cannot be started
    /// - [`SolcError::StreamIo`] on pipe failures
    pub async fn compile(
        &self,
        source: &[u8],
        version: &str,
        combined_json: bool,
        options: &[SolcOption],
    ) -> Result<CompilationResult> {
        self.compile_request(
            CompileRequest::new(source, version)
                .combined_json(combined_json)
                .options(options.iter().cloned()),
        )
        .await
    }

    /// Run a configured compilation
    ///
    /// # Errors
    ///
    /// As [`compile`](Self::compile), plus [`SolcError::ExecutionInterrupted`]
    /// when the request's cancellation token fires
    #[tracing::instrument(
        name = "solc_compile",
        skip_all,
        fields(
            version = %request.version,
            source_bytes = request.source.len(),
            combined_json = request.combined_json,
            optimize = request.optimize,
        ),
        level = "info"
    )]
    pub async fn compile_request(&self, request: CompileRequest) -> Result<CompilationResult> {
        let handle = self.registry.resolve(&request.version)?;
        let spec = command::build(
            &handle,
            request.optimize,
            request.combined_json,
            &request.options,
        )?;

        let output = runner(request.cancel)
            .execute(&spec, &request.source)
            .await?;

        if !output.success() {
            tracing::debug!(status_code = ?output.status_code, "Compilation failed");
        }

        let success = output.success();
        Ok(CompilationResult::new(output.stderr, output.stdout, success))
    }

    /// Raw `solc --version` output
    ///
    /// # Errors
    ///
    /// - [`SolcError::UnsupportedVersion`] for unknown version keys, before
    ///   any process is spawned
    /// - [`SolcError::ProcessStart`] if solc cannot be started
    /// - [`SolcError::VersionQuery`] if solc exits non-zero
    #[tracing::instrument(name = "solc_get_version", skip(self), level = "info")]
    pub async fn get_version(&self, version: &str) -> Result<String> {
        let handle = self.registry.resolve(version)?;
        let spec = command::build_version_query(&handle);
        let output = ProcessRunner::new().execute(&spec, &[]).await?;

        if output.success() {
            Ok(output.stdout)
        } else {
            Err(SolcError::version_query(version, output.stderr))
        }
    }

    /// Release reported by the installation, e.g. `0.8.19`
    ///
    /// # Errors
    ///
    /// As [`get_version`](Self::get_version); additionally
    /// [`SolcError::VersionQuery`] if the output holds no `Version:` line
    pub async fn installed_version(&self, version: &str) -> Result<semver::Version> {
        let key: SolcVersion = version.parse()?;
        let output = self.get_version(version).await?;
        let release = parse_version_output(&output).ok_or_else(|| {
            SolcError::version_query(version, format!("unrecognized version output: {}", output.trim()))
        })?;

        if !key.matches(&release) {
            tracing::warn!(
                expected = %key,
                found = %release,
                "Installed solc does not belong to the requested release line"
            );
        }

        Ok(release)
    }
}

fn runner(cancel: Option<CancellationToken>) -> ProcessRunner {
    cancel.map_or_else(ProcessRunner::new, ProcessRunner::with_cancellation)
}
