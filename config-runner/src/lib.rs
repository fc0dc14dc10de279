//! Locate, transpile, and run a TypeScript/JavaScript config module.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure logic (candidate paths, `VERBOSE` parsing, source kind).
//! - **[`io`]**: Side effects (filesystem probes, transpiler and runtime
//!   subprocesses), each behind a trait so tests can substitute fakes.
//!
//! Orchestration modules ([`locate`], [`run`]) compose the two to implement the
//! `config-runner` command.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod locate;
pub mod logging;
pub mod run;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
