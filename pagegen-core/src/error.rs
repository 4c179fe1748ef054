//! Error types for pagegen-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{AttributeName, EntityId};

/// Errors raised while reading the build inputs (lists and template).
#[derive(Debug, Error)]
pub enum InputError {
    /// Underlying I/O failure, annotated with the path that was read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input was readable but held no usable content.
    #[error("{what} at {path} is empty")]
    Empty { what: &'static str, path: PathBuf },

    /// An in-memory source was built without this input.
    #[error("{0} was not provided")]
    Missing(&'static str),

    /// Content from a source without a backing file was empty.
    #[error("{0} is empty")]
    EmptyContent(&'static str),
}

/// A single (entity, attribute) lookup that produced no content.
///
/// Never fatal: the attribute is simply left out of the entity's map.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no content for {entity}/{attribute}")]
    NotFound {
        entity: EntityId,
        attribute: AttributeName,
    },

    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading a [`crate::config::BuildConfig`] file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error, with the file path for context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience constructor for [`InputError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> InputError {
    InputError::Io {
        path: path.into(),
        source,
    }
}
