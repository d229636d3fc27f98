use thiserror::Error;

use timetabler::{ConfigError, LoadError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot load term: {0}")]
    Load(#[from] LoadError),

    #[error("cannot load config: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A `--view` names an entity the term does not have.
    #[error("no {kind} with key `{key}`")]
    UnknownKey { kind: &'static str, key: String },

    /// A `--view` is not of the form `kind:key`.
    #[error("invalid view `{0}`: expected faculty:KEY, room:KEY, batch:KEY or student:KEY")]
    InvalidView(String),
}
