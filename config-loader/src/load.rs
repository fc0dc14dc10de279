//! Load, validate, and resynchronize a JSON config file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::ConfigError;
use crate::schema::{Schema, SchemaError};
use crate::store::{canonical_text, read_config_text, write_config_text};

/// File name used by [`load_default`].
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// What to do when the config file does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFile {
    /// Write the schema defaults to disk on first run.
    #[default]
    CreateDefaults,
    /// Treat the file as `{}` and write only if the canonical defaults differ
    /// from `{}`.
    WriteOnDrift,
}

/// When to rewrite an existing, valid config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rewrite {
    /// Rewrite only if the canonical value is not deep-equal to the parsed
    /// file. Key order and formatting are ignored.
    #[default]
    OnSemanticDrift,
    /// Rewrite whenever the file text differs from the canonical text.
    OnTextDrift,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Directory relative paths are resolved against. Defaults to the process
    /// working directory.
    pub base_dir: Option<PathBuf>,
    pub missing: MissingFile,
    pub rewrite: Rewrite,
}

/// The write performed by a load, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadAction {
    /// The file was missing and defaults were written.
    Created,
    /// The file existed and was replaced by its canonical form.
    Rewritten,
    /// Nothing was written.
    Untouched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    /// Resolved absolute (or base-relative) path of the config file.
    pub path: PathBuf,
    pub action: LoadAction,
}

/// Load `filepath` (relative to the working directory) through `schema`.
///
/// Creates the file from defaults if it is missing and rewrites it if its
/// canonical form has drifted. See [`load_with`] for the knobs.
pub fn load<T>(schema: &Schema<T>, filepath: impl AsRef<Path>) -> Result<T, ConfigError> {
    load_with(schema, filepath, &LoadOptions::default()).map(|loaded| loaded.value)
}

/// [`load`] against [`DEFAULT_CONFIG_FILE`].
pub fn load_default<T>(schema: &Schema<T>) -> Result<T, ConfigError> {
    load(schema, DEFAULT_CONFIG_FILE)
}

/// Absolute paths pass through; relative ones are joined to `base_dir`, or to
/// the current directory when no base is given.
pub fn resolve_config_path(
    base_dir: Option<&Path>,
    filepath: &Path,
) -> Result<PathBuf, ConfigError> {
    if filepath.is_absolute() {
        return Ok(filepath.to_path_buf());
    }
    match base_dir {
        Some(base) => Ok(base.join(filepath)),
        None => std::env::current_dir()
            .map(|cwd| cwd.join(filepath))
            .map_err(|source| ConfigError::WorkingDir { source }),
    }
}

/// Load `filepath` through `schema` and report which write, if any, happened.
///
/// At most one write is performed, synchronously, before returning.
#[instrument(skip_all, fields(filepath = %filepath.as_ref().display()))]
pub fn load_with<T>(
    schema: &Schema<T>,
    filepath: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Loaded<T>, ConfigError> {
    let path = resolve_config_path(options.base_dir.as_deref(), filepath.as_ref())?;

    let text = read_config_text(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let Some(text) = text else {
        return load_missing(schema, path, options.missing);
    };

    let raw: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
        raw: text.clone(),
    })?;
    let value = schema
        .validate(&raw)
        .map_err(|source| ConfigError::Validation {
            path: path.clone(),
            source,
            raw: pretty(&raw),
        })?;
    let canonical = schema
        .serialize(&value)
        .map_err(|source| ConfigError::Serialize {
            path: path.clone(),
            source,
        })?;

    let drifted = match options.rewrite {
        Rewrite::OnSemanticDrift => canonical != raw,
        Rewrite::OnTextDrift => render(&path, &canonical)? != text,
    };
    if !drifted {
        debug!(path = %path.display(), "config file already canonical");
        return Ok(Loaded {
            value,
            path,
            action: LoadAction::Untouched,
        });
    }

    info!(path = %path.display(), "rewriting config file in canonical form");
    write(&path, &canonical)?;
    Ok(Loaded {
        value,
        path,
        action: LoadAction::Rewritten,
    })
}

fn load_missing<T>(
    schema: &Schema<T>,
    path: PathBuf,
    policy: MissingFile,
) -> Result<Loaded<T>, ConfigError> {
    let empty = Value::Object(Map::new());
    let value = schema
        .validate(&empty)
        .map_err(|source| ConfigError::MissingDefaults {
            path: path.clone(),
            source,
        })?;
    let canonical = schema
        .serialize(&value)
        .map_err(|source| ConfigError::Serialize {
            path: path.clone(),
            source,
        })?;

    if policy == MissingFile::WriteOnDrift && canonical == empty {
        debug!(path = %path.display(), "defaults match empty config, not writing");
        return Ok(Loaded {
            value,
            path,
            action: LoadAction::Untouched,
        });
    }

    info!(path = %path.display(), "config file missing, writing defaults");
    write(&path, &canonical)?;
    Ok(Loaded {
        value,
        path,
        action: LoadAction::Created,
    })
}

fn write(path: &Path, canonical: &Value) -> Result<(), ConfigError> {
    let text = render(path, canonical)?;
    write_config_text(path, &text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn render(path: &Path, canonical: &Value) -> Result<String, ConfigError> {
    canonical_text(canonical).map_err(|err| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: SchemaError::from(err),
    })
}

fn pretty(raw: &Value) -> String {
    serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string())
}
