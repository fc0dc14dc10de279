//! Candidate config module paths.

use std::path::{Path, PathBuf};

/// Paths probed, in order, when no explicit path is given.
pub const DEFAULT_CANDIDATES: [&str; 4] = [
    "config.ts",
    "config.js",
    "src/config.ts",
    "src/config.js",
];

/// Ordered candidate paths for one invocation.
///
/// An explicit `path_arg` is the sole candidate. Relative entries are joined to
/// `base_dir`; absolute entries are kept as-is.
pub fn candidate_paths(base_dir: &Path, path_arg: Option<&str>) -> Vec<PathBuf> {
    match path_arg {
        Some(path) => vec![resolve(base_dir, path)],
        None => DEFAULT_CANDIDATES
            .iter()
            .map(|path| resolve(base_dir, path))
            .collect(),
    }
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_joined_in_order() {
        let paths = candidate_paths(Path::new("/work"), None);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/work/config.ts"),
                PathBuf::from("/work/config.js"),
                PathBuf::from("/work/src/config.ts"),
                PathBuf::from("/work/src/config.js"),
            ]
        );
    }

    #[test]
    fn explicit_relative_path_is_sole_candidate() {
        let paths = candidate_paths(Path::new("/work"), Some("tools/setup.ts"));
        assert_eq!(paths, vec![PathBuf::from("/work/tools/setup.ts")]);
    }

    #[cfg(unix)]
    #[test]
    fn explicit_absolute_path_is_used_as_is() {
        let paths = candidate_paths(Path::new("/work"), Some("/etc/app/config.js"));
        assert_eq!(paths, vec![PathBuf::from("/etc/app/config.js")]);
    }
}
