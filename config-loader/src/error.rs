//! Error taxonomy for [`load`](crate::load).

use std::fmt::Display;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaError;

/// Category of a [`ConfigError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    WorkingDir,
    MissingDefaults,
    Read,
    Parse,
    Validation,
    Serialize,
    Write,
}

/// Failure loading, validating, or persisting a config file.
///
/// Display output appends the underlying cause (indented) so the message alone
/// is enough to diagnose the problem.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to resolve working directory\n{}", indent(.source))]
    WorkingDir { source: io::Error },

    /// The file does not exist and the schema rejects `{}`.
    #[error("Missing config file: {}\n{}", .path.display(), indent(.source))]
    MissingDefaults { path: PathBuf, source: SchemaError },

    #[error("Failed to read config file: {}\n{}", .path.display(), indent(.source))]
    Read { path: PathBuf, source: io::Error },

    /// The file exists but is not JSON. `raw` is the file text as read.
    #[error(
        "Config validation failed: {} is not valid JSON\n{}\n\n{}",
        .path.display(),
        indent(.source),
        .raw
    )]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
        raw: String,
    },

    /// The schema rejected the parsed input. `raw` is the pretty-printed input.
    #[error(
        "Config validation failed: {}\n{}\n\n{}",
        .path.display(),
        indent(.source),
        .raw
    )]
    Validation {
        path: PathBuf,
        source: SchemaError,
        raw: String,
    },

    #[error("Failed to serialize config: {}\n{}", .path.display(), indent(.source))]
    Serialize { path: PathBuf, source: SchemaError },

    #[error("Failed to write config file: {}\n{}", .path.display(), indent(.source))]
    Write { path: PathBuf, source: io::Error },
}

impl ConfigError {
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::WorkingDir { .. } => ConfigErrorKind::WorkingDir,
            Self::MissingDefaults { .. } => ConfigErrorKind::MissingDefaults,
            Self::Read { .. } => ConfigErrorKind::Read,
            Self::Parse { .. } => ConfigErrorKind::Parse,
            Self::Validation { .. } => ConfigErrorKind::Validation,
            Self::Serialize { .. } => ConfigErrorKind::Serialize,
            Self::Write { .. } => ConfigErrorKind::Write,
        }
    }
}

/// Indent every line of `cause` by four spaces.
fn indent(cause: impl Display) -> String {
    cause
        .to_string()
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn indent_prefixes_each_line() {
        assert_eq!(indent("a\nb"), "    a\n    b");
    }

    #[test]
    fn validation_message_includes_cause_and_raw_dump() {
        let err = ConfigError::Validation {
            path: PathBuf::from("/etc/app/config.json"),
            source: SchemaError::new("port: expected number"),
            raw: "{\n  \"port\": \"x\"\n}".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Config validation failed: /etc/app/config.json"));
        assert!(message.contains("\n    port: expected number\n"));
        assert!(message.ends_with("{\n  \"port\": \"x\"\n}"));
        assert_eq!(err.kind(), ConfigErrorKind::Validation);
    }

    #[test]
    fn read_error_chains_io_source() {
        let err = ConfigError::Read {
            path: PathBuf::from("config.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(err.to_string().contains("    permission denied"));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "permission denied");
    }
}
