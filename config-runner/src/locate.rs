//! Config module resolution for `config-runner`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::io::fs::SourceFs;

/// Return the first candidate that exists.
///
/// Candidates are only existence-probed, never read. Probe failures of any kind
/// count as "not found" and the next candidate is tried.
pub fn locate_config<F: SourceFs>(
    fs: &F,
    candidates: &[PathBuf],
    verbose: bool,
) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|path| probe(fs, path, verbose))
        .cloned()
}

fn probe<F: SourceFs>(fs: &F, path: &Path, verbose: bool) -> bool {
    if verbose {
        info!(path = %path.display(), "looking for config file");
    }
    let found = fs.exists(path);
    debug!(path = %path.display(), found, "probed candidate");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidates::candidate_paths;
    use crate::test_support::{FsCall, RecordingFs};

    #[test]
    fn picks_first_existing_candidate() {
        let fs = RecordingFs::new().with_file("/work/config.js", "module.exports = {}");
        let candidates = candidate_paths(Path::new("/work"), None);

        let found = locate_config(&fs, &candidates, false);
        assert_eq!(found, Some(PathBuf::from("/work/config.js")));
        assert_eq!(
            fs.calls(),
            vec![
                FsCall::Probe(PathBuf::from("/work/config.ts")),
                FsCall::Probe(PathBuf::from("/work/config.js")),
            ]
        );
    }

    #[test]
    fn earlier_candidate_wins() {
        let fs = RecordingFs::new()
            .with_file("/work/src/config.ts", "")
            .with_file("/work/config.ts", "");
        let candidates = candidate_paths(Path::new("/work"), None);

        let found = locate_config(&fs, &candidates, true);
        assert_eq!(found, Some(PathBuf::from("/work/config.ts")));
        assert_eq!(fs.calls().len(), 1);
    }

    #[test]
    fn returns_none_after_probing_all() {
        let fs = RecordingFs::new();
        let candidates = candidate_paths(Path::new("/work"), None);

        assert_eq!(locate_config(&fs, &candidates, false), None);
        assert_eq!(fs.calls().len(), candidates.len());
        assert!(
            fs.calls()
                .iter()
                .all(|call| matches!(call, FsCall::Probe(_)))
        );
    }
}
