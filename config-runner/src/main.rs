//! Run a project's config module.
//!
//! Probes `config.ts`, `config.js`, `src/config.ts`, `src/config.js` (or the
//! given path), transpiles the first one found, and runs it with the
//! runtime's output relayed to this process.

use anyhow::{Context, Result};
use clap::Parser;

use config_runner::core::verbosity::verbose_from_env;
use config_runner::exit_codes;
use config_runner::io::fs::OsFs;
use config_runner::io::launch::NodeLauncher;
use config_runner::io::transpile::CommandTranspiler;
use config_runner::logging;
use config_runner::run::{RunOptions, RunOutcome, run_config};
use config_runner::settings::RunnerSettings;

#[derive(Parser)]
#[command(
    name = "config-runner",
    version,
    about = "Locate, transpile, and run a TypeScript/JavaScript config module"
)]
struct Cli {
    /// Config module to run instead of the default candidates.
    path: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let verbose = verbose_from_env(
        std::env::var_os("VERBOSE")
            .map(|value| value.to_string_lossy().into_owned())
            .as_deref(),
    );
    logging::init(verbose);

    match run(cli, verbose) {
        Ok(RunOutcome::NotFound) => {
            eprintln!("Config not found");
            std::process::exit(exit_codes::NOT_FOUND);
        }
        Ok(RunOutcome::Exited(code)) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli, verbose: bool) -> Result<RunOutcome> {
    let settings = RunnerSettings::default();
    settings.validate()?;
    let options = RunOptions {
        base_dir: std::env::current_dir().context("resolve working directory")?,
        path_arg: cli.path,
        verbose,
    };
    run_config(
        &OsFs,
        &CommandTranspiler::from_settings(&settings),
        &NodeLauncher::from_settings(&settings),
        &options,
    )
}
