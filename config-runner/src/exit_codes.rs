//! Stable exit codes for the config runner.

use std::process::ExitStatus;

/// Child exited successfully.
pub const OK: i32 = 0;
/// No candidate config module exists.
pub const NOT_FOUND: i32 = 1;
/// Reading, transpiling, or launching failed.
pub const INVALID: i32 = 1;

/// Exit code to propagate for a finished child.
///
/// A child killed by a signal maps to `128 + signal` on Unix, matching shells.
pub fn from_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    signal_code(status).unwrap_or(INVALID)
}

#[cfg(unix)]
fn signal_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_code(_status: ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn exit_code_is_inherited() {
        assert_eq!(from_status(ExitStatus::from_raw(0)), OK);
        assert_eq!(from_status(ExitStatus::from_raw(3 << 8)), 3);
    }

    #[test]
    fn signal_maps_to_128_plus_signal() {
        // Raw wait status of a process killed by SIGKILL (9).
        assert_eq!(from_status(ExitStatus::from_raw(9)), 137);
    }
}
