//! # pagegen-pipeline
//!
//! Three-phase parallel page build: load attributes, render, write.
//!
//! Build an [`Orchestrator`] from a [`pagegen_core::ContentSource`] (or a
//! [`pagegen_core::BuildConfig`]) and call [`Orchestrator::run`]. Each phase
//! fans out over a bounded pool and joins completely before the next one
//! starts; the returned [`BuildReport`] lists what was written and every task
//! that failed.

pub mod diff;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod pool;
pub mod render;
pub mod report;
pub mod state;
pub mod store;
pub mod writer;

pub use diff::{diff_builds, FileDiff};
pub use error::{PipelineError, TaskError};
pub use loader::SkippedAttribute;
pub use pipeline::{BuildSettings, Orchestrator};
pub use pool::PoolOptions;
pub use report::{BuildReport, TaskFailure};
pub use state::{Phase, PipelineState};
pub use store::{AttributeStore, BuildStore};
pub use writer::{OutputWriter, WriteResult};

pub use tokio_util::sync::CancellationToken;
