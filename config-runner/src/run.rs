//! Orchestration for a single `config-runner` invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::candidates::candidate_paths;
use crate::core::source::SourceKind;
use crate::io::fs::SourceFs;
use crate::io::launch::{LaunchRequest, Launcher};
use crate::io::transpile::{TranspileRequest, Transpiler};
use crate::locate::locate_config;

/// Inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Directory relative candidates are resolved against; also the child's
    /// working directory.
    pub base_dir: PathBuf,
    /// Explicit config module path; replaces the default candidates.
    pub path_arg: Option<String>,
    /// Log each candidate probe and the final read.
    pub verbose: bool,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No candidate exists; nothing was spawned.
    NotFound,
    /// The config module ran and exited with this code.
    Exited(i32),
}

/// Locate, read, transpile, and execute a config module.
#[instrument(skip_all, fields(base_dir = %options.base_dir.display(), path_arg = ?options.path_arg))]
pub fn run_config<F, T, L>(
    fs: &F,
    transpiler: &T,
    launcher: &L,
    options: &RunOptions,
) -> Result<RunOutcome>
where
    F: SourceFs,
    T: Transpiler,
    L: Launcher,
{
    let candidates = candidate_paths(&options.base_dir, options.path_arg.as_deref());
    let Some(config_path) = locate_config(fs, &candidates, options.verbose) else {
        debug!(candidates = candidates.len(), "no config module found");
        return Ok(RunOutcome::NotFound);
    };

    if options.verbose {
        info!(path = %config_path.display(), "reading config file");
    }
    let source = fs
        .read_to_string(&config_path)
        .context("read config module")?;

    let code = transpiler
        .transpile(&TranspileRequest {
            source_path: config_path.clone(),
            source,
            kind: SourceKind::from_path(&config_path),
        })
        .with_context(|| format!("transpile {}", config_path.display()))?;

    let code = launcher.launch(&LaunchRequest {
        workdir: options.base_dir.clone(),
        source_path: config_path,
        code,
    })?;
    Ok(RunOutcome::Exited(code))
}
