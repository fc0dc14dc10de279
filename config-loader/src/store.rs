//! Raw config file I/O.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

const MAX_SYMLINK_HOPS: usize = 40;

/// Read the config file, returning `None` if it does not exist.
pub fn read_config_text(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!(path = %path.display(), bytes = text.len(), "read config file");
            Ok(Some(text))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Canonical on-disk text for `value`: two-space indentation, trailing newline.
pub fn canonical_text(value: &Value) -> serde_json::Result<String> {
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    Ok(buf)
}

/// Atomically replace the config file's contents (temp file + rename).
///
/// Symlinks are followed so the link target is updated and the link kept, and
/// an existing file's permissions carry over to the new contents.
pub fn write_config_text(path: &Path, contents: &str) -> io::Result<()> {
    let target = resolve_target(path)?;
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = target
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("config path has no file name: {}", target.display()),
            )
        })?
        .to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = target.with_file_name(tmp_name);

    let existing = match fs::metadata(&target) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(err),
    };
    fs::write(&tmp_path, contents)?;
    if let Some(permissions) = existing {
        if let Err(err) = fs::set_permissions(&tmp_path, permissions) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }
    }
    fs::rename(&tmp_path, &target)?;
    debug!(
        path = %path.display(),
        target = %target.display(),
        bytes = contents.len(),
        "wrote config file"
    );
    Ok(())
}

/// Follow symlinks at `path` to the file that should receive the write.
///
/// Dangling links resolve to their (not yet existing) target.
fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let link = fs::read_link(&current)?;
                current = match current.parent() {
                    Some(parent) if link.is_relative() => parent.join(link),
                    _ => link,
                };
            }
            Ok(_) => return Ok(current),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(current),
            Err(err) => return Err(err),
        }
    }
    Err(io::Error::other(format!(
        "too many levels of symbolic links: {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_missing_returns_none() {
        let temp = tempfile::tempdir().expect("tempdir");
        let text = read_config_text(&temp.path().join("missing.json")).expect("read");
        assert_eq!(text, None);
    }

    #[test]
    fn read_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        read_config_text(temp.path()).expect_err("directory is not a file");
    }

    /// Ensures the canonical format is stable: two-space indent, trailing newline.
    #[test]
    fn write_uses_two_space_indent_and_trailing_newline() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("config.json");
        let text = canonical_text(&json!({ "a": 1, "b": [true] })).expect("canonical");
        write_config_text(&path, &text).expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "{\n  \"a\": 1,\n  \"b\": [\n    true\n  ]\n}\n");
        assert!(!temp.path().join("nested").join("config.json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(&path, "{}").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");

        write_config_text(&path, "{\n  \"secret\": \"x\"\n}\n").expect("write");
        let mode = fs::metadata(&path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn write_goes_through_symlink() {
        let temp = tempfile::tempdir().expect("tempdir");
        let target = temp.path().join("shared.json");
        let link = temp.path().join("config.json");
        fs::write(&target, "{}").expect("seed");
        std::os::unix::fs::symlink("shared.json", &link).expect("symlink");

        write_config_text(&link, "{\n  \"a\": 1\n}\n").expect("write");
        assert!(fs::symlink_metadata(&link).expect("metadata").file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).expect("read"), "{\n  \"a\": 1\n}\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_creates_dangling_symlink_target() {
        let temp = tempfile::tempdir().expect("tempdir");
        let link = temp.path().join("config.json");
        std::os::unix::fs::symlink(temp.path().join("real.json"), &link).expect("symlink");

        write_config_text(&link, "{}\n").expect("write");
        assert!(fs::symlink_metadata(&link).expect("metadata").file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(temp.path().join("real.json")).expect("read"),
            "{}\n"
        );
    }
}
