//! Error types surfaced by catalog loading and simulation entry points.

use std::path::PathBuf;

use thiserror::Error;

/// Catalog problems. Raised at load time, before any simulation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("catalog not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("unable to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("catalog has no top-level `cards` array")]
    MissingCards,

    #[error("card entry[{index}]: {message}")]
    InvalidCard { index: usize, message: String },

    #[error("duplicate card id '{0}'")]
    DuplicateId(String),
}

/// Rejected simulation inputs.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("none of the supplied card ids resolved against the catalog: {ids:?}")]
    NoKnownCards { ids: Vec<String> },

    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        field: &'static str,
        constraint: &'static str,
        value: f64,
    },
}

/// Failure writing optimizer results.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Error)]
pub enum DanqingError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, DanqingError>;
