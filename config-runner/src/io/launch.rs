//! Launcher abstraction for executing transpiled config modules.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument};

use crate::exit_codes;
use crate::io::process::run_command_relay;
use crate::settings::RunnerSettings;

/// A program to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Working directory for the child process.
    pub workdir: PathBuf,
    /// Config module the code was transpiled from.
    pub source_path: PathBuf,
    /// Transpiled, directly executable code.
    pub code: String,
}

pub trait Launcher {
    /// Run the program to completion and return its exit code.
    fn launch(&self, request: &LaunchRequest) -> Result<i32>;
}

/// Launcher that feeds the program to a JavaScript runtime on stdin and relays
/// the runtime's stdout/stderr to this process.
///
/// Stdin is closed once the program text is written, so the program itself
/// receives no input.
#[derive(Debug, Clone)]
pub struct NodeLauncher {
    runtime: Vec<String>,
}

impl NodeLauncher {
    pub fn new(runtime: Vec<String>) -> Self {
        Self { runtime }
    }

    pub fn from_settings(settings: &RunnerSettings) -> Self {
        Self::new(settings.runtime.clone())
    }
}

impl Launcher for NodeLauncher {
    #[instrument(skip_all, fields(source = %request.source_path.display()))]
    fn launch(&self, request: &LaunchRequest) -> Result<i32> {
        let (program, args) = self
            .runtime
            .split_first()
            .ok_or_else(|| anyhow!("runtime command is empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&request.workdir);

        let status = run_command_relay(
            cmd,
            Some(request.code.as_bytes()),
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
        .with_context(|| format!("run {}", request.source_path.display()))?;

        let code = exit_codes::from_status(status);
        debug!(code, "config module exited");
        Ok(code)
    }
}
