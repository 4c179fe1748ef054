//! Error types for pagegen-pipeline.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use pagegen_core::InputError;

use crate::state::PipelineState;

/// Errors that stop a run.
///
/// Only the template is load-bearing: every other failure is recorded per
/// task in the [`crate::BuildReport`] and the run carries on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The template is missing, unreadable or empty.
    #[error("template unavailable: {0}")]
    TemplateUnavailable(#[source] InputError),

    /// `run` or `plan` was called on an orchestrator that already ran.
    #[error("pipeline already ran (state: {0})")]
    AlreadyRan(PipelineState),

    /// An I/O error outside any single task (diffing against disk).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of one task inside a phase. Never aborts sibling tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The rendered page could not be written.
    #[error("failed to write {filename}: {source}")]
    OutputWrite {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    /// A write task found no document for its filename.
    #[error("no rendered document for {filename}")]
    MissingDocument { filename: String },

    #[error("task timed out after {0:?}")]
    TimedOut(Duration),

    #[error("task cancelled")]
    Cancelled,

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Convenience constructor for [`TaskError::OutputWrite`].
pub(crate) fn write_err(filename: impl Into<String>, source: std::io::Error) -> TaskError {
    TaskError::OutputWrite {
        filename: filename.into(),
        source,
    }
}

/// Convenience constructor for [`PipelineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}
