//! Filesystem access for locating and reading config modules.

use std::path::Path;

use anyhow::{Context, Result};

/// The two filesystem operations the runner needs.
///
/// Kept behind a trait so tests can observe which paths were probed versus read.
pub trait SourceFs {
    /// Access probe. Any failure (missing, permission denied) counts as absent.
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> Result<String>;
}

/// [`SourceFs`] backed by the real filesystem.
pub struct OsFs;

impl SourceFs for OsFs {
    fn exists(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
    }
}
