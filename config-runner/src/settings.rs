//! Runner settings: which runtime executes config modules and which tool
//! transpiles them.

use std::time::Duration;

use anyhow::{Result, anyhow};

/// Commands and limits used by a run.
///
/// These are code-level defaults passed into [`crate::run::run_config`] through
/// the transpiler and launcher; nothing here is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Program (plus leading args) that executes the transpiled module read
    /// from stdin.
    pub runtime: Vec<String>,

    /// Program (plus leading args) that reads source on stdin and writes
    /// CommonJS on stdout. `--loader=<kind>` and `--sourcefile=<path>` are
    /// appended per run.
    pub transpiler: Vec<String>,

    /// Wall-clock budget for the transpiler in seconds.
    pub transpile_timeout_secs: u64,

    /// Truncate transpiler stdout/stderr beyond this many bytes.
    pub transpile_output_limit_bytes: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            runtime: vec!["node".to_string()],
            transpiler: vec![
                "esbuild".to_string(),
                "--format=cjs".to_string(),
                "--log-level=warning".to_string(),
            ],
            transpile_timeout_secs: 60,
            transpile_output_limit_bytes: 16 * 1024 * 1024,
        }
    }
}

impl RunnerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.runtime.is_empty() || self.runtime[0].trim().is_empty() {
            return Err(anyhow!("runtime must be a non-empty command"));
        }
        if self.transpiler.is_empty() || self.transpiler[0].trim().is_empty() {
            return Err(anyhow!("transpiler must be a non-empty command"));
        }
        if self.transpile_timeout_secs == 0 {
            return Err(anyhow!("transpile_timeout_secs must be > 0"));
        }
        if self.transpile_output_limit_bytes == 0 {
            return Err(anyhow!("transpile_output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn transpile_timeout(&self) -> Duration {
        Duration::from_secs(self.transpile_timeout_secs)
    }
}
