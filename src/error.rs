//! Error types for the I/O edges: config and map loading.
//!
//! The tick itself never fails; see `sim::step`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("schedule has no phases")]
    EmptySchedule,

    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read map {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map {0} has no rows")]
    Empty(String),
}

pub type LevelResult<T> = Result<T, LevelError>;
