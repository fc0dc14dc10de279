//! Schema-validated JSON config files that keep themselves canonical.
//!
//! [`load`] reads a JSON file, runs it through a [`Schema`] (a validator and
//! serializer pair), and returns the typed value:
//!
//! - **Missing file**: the schema's defaults (the result of validating `{}`) are
//!   written to disk and returned. A schema that rejects `{}` yields
//!   [`ConfigError::MissingDefaults`] and no file is created.
//! - **Existing file**: the validated value is serialized back to its canonical
//!   form; if that differs from what was read, the file is rewritten.
//!
//! ```no_run
//! use config_loader::{Schema, load};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(default)]
//! struct Config {
//!     port: u16,
//! }
//!
//! impl Default for Config {
//!     fn default() -> Self {
//!         Self { port: 8080 }
//!     }
//! }
//!
//! let config: Config = load(&Schema::serde(), "config.json")?;
//! # Ok::<(), config_loader::ConfigError>(())
//! ```

pub mod error;
pub mod load;
pub mod schema;
pub mod store;

pub use error::{ConfigError, ConfigErrorKind};
pub use load::{
    DEFAULT_CONFIG_FILE, LoadAction, LoadOptions, Loaded, MissingFile, Rewrite, load,
    load_default, load_with, resolve_config_path,
};
pub use schema::{Schema, SchemaError};
