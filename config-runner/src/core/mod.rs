//! Pure, deterministic logic for the config runner. No I/O.

pub mod candidates;
pub mod source;
pub mod verbosity;
