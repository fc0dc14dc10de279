//! Tracing setup for the `config-runner` binary.
//!
//! Diagnostics go to stderr so they never mix with the config module's stdout.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive enabled by `VERBOSE` on top of whatever `RUST_LOG` selects.
const VERBOSE_DIRECTIVE: &str = "config_runner=info";

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

/// Filter directives for the given `RUST_LOG` value and `VERBOSE` flag.
///
/// `VERBOSE` always turns on this crate's `info` events. A `RUST_LOG` directive
/// naming `config_runner` comes later in the list and so takes precedence.
pub fn filter_directives(rust_log: Option<&str>, verbose: bool) -> String {
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(rust_log) if verbose => format!("{VERBOSE_DIRECTIVE},{rust_log}"),
        Some(rust_log) => rust_log.to_string(),
        None => default_directive(verbose).to_string(),
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` sets the base filter; `VERBOSE` adds `config_runner=info` so the
/// candidate lookups and the final read are shown either way. An unparsable
/// `RUST_LOG` falls back to the default filter.
///
/// # Example
/// ```bash
/// RUST_LOG=config_runner=debug config-runner src/config.ts
/// ```
pub fn init(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::try_new(filter_directives(rust_log.as_deref(), verbose))
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .compact(),
        )
        .init();
}
