//! Transpiler abstraction: typed/module source in, directly runnable code out.
//!
//! The [`Transpiler`] trait decouples the run pipeline from the transform tool
//! (currently an `esbuild`-compatible command). Tests use recording
//! transpilers that never spawn processes.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::core::source::SourceKind;
use crate::io::process::run_command_with_timeout;
use crate::settings::RunnerSettings;

/// Source handed to a [`Transpiler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileRequest {
    /// Path the source was read from (used in diagnostics).
    pub source_path: PathBuf,
    pub source: String,
    pub kind: SourceKind,
}

pub trait Transpiler {
    /// Transform `request.source` into plain executable code.
    fn transpile(&self, request: &TranspileRequest) -> Result<String>;
}

/// Transpiler that pipes source through an external command.
#[derive(Debug, Clone)]
pub struct CommandTranspiler {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandTranspiler {
    pub fn new(command: Vec<String>, timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            command,
            timeout,
            output_limit_bytes,
        }
    }

    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self::new(
            settings.transpiler.clone(),
            settings.transpile_timeout(),
            settings.transpile_output_limit_bytes,
        )
    }

    fn build_command(&self, kind: SourceKind, source_path: &Path) -> Result<Command> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("transpiler command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg(format!("--loader={}", kind.loader()))
            .arg(format!("--sourcefile={}", source_path.display()));
        if let Some(dir) = source_path.parent() {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

impl Transpiler for CommandTranspiler {
    #[instrument(skip_all, fields(source = %request.source_path.display(), kind = request.kind.loader()))]
    fn transpile(&self, request: &TranspileRequest) -> Result<String> {
        let cmd = self.build_command(request.kind, &request.source_path)?;
        let output = run_command_with_timeout(
            cmd,
            Some(request.source.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        )
        .context("run transpiler")?;

        if output.timed_out {
            warn!(timeout_secs = self.timeout.as_secs(), "transpiler timed out");
            return Err(anyhow!(
                "transpiling {} timed out after {:?}",
                request.source_path.display(),
                self.timeout
            ));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "transpiler failed");
            return Err(anyhow!(
                "transpiling {} failed with status {:?}:\n{}",
                request.source_path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim_end()
            ));
        }
        if output.stdout_truncated > 0 {
            return Err(anyhow!(
                "transpiled output for {} exceeds {} bytes",
                request.source_path.display(),
                self.output_limit_bytes
            ));
        }

        let code = String::from_utf8(output.stdout).context("transpiler output is not utf-8")?;
        debug!(bytes = code.len(), "transpiled source");
        Ok(code)
    }
}
