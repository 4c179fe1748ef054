//! Bounded fan-out for one phase, followed by a full join.
//!
//! [`run_phase`] hands every item to the `work` closure, keeping at most
//! `limit` tasks in flight, and only returns once every spawned task has
//! finished. The returned outcomes are the phase barrier: nothing from the
//! next phase may start before they are in hand.

use std::fmt::Display;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::state::Phase;

/// Scheduling knobs shared by all phases of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum tasks in flight per phase.
    pub limit: NonZeroUsize,
    /// Per-task deadline; `None` waits forever.
    ///
    /// A timed-out task gives back its slot at once, but blocking I/O it
    /// started keeps running to completion, so with timeouts set `limit` is
    /// not a hard cap on concurrent I/O.
    pub task_timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        PoolOptions {
            limit: std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            task_timeout: None,
        }
    }
}

/// Result of one task, labelled with the item it worked on.
#[derive(Debug)]
pub struct TaskOutcome<T> {
    pub item: String,
    pub result: Result<T, TaskError>,
}

/// Run `work` once per item with bounded concurrency and wait for all.
///
/// Items are issued in order. A task that is cancelled, times out or panics
/// yields an `Err` outcome; the other tasks are unaffected. Once `cancel`
/// fires, items that have not started are reported as
/// [`TaskError::Cancelled`] without calling `work`.
pub async fn run_phase<I, T, F, Fut>(
    phase: Phase,
    items: Vec<I>,
    options: &PoolOptions,
    cancel: &CancellationToken,
    work: F,
) -> Vec<TaskOutcome<T>>
where
    I: Display,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T, TaskError>> + Send + 'static,
{
    let started = Instant::now();
    let total = items.len();
    tracing::info!(%phase, tasks = total, limit = options.limit.get(), "phase started");

    let semaphore = Arc::new(Semaphore::new(options.limit.get()));
    let mut handles = Vec::with_capacity(total);

    for item in items {
        let label = item.to_string();
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
        };
        let Some(permit) = permit else {
            handles.push((label, None));
            continue;
        };

        let task = work(item);
        let cancel = cancel.clone();
        let timeout = options.task_timeout;
        let handle = tokio::spawn(async move {
            let _permit = permit;
            if cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }
            let bounded = async move {
                match timeout {
                    Some(limit) => tokio::time::timeout(limit, task)
                        .await
                        .unwrap_or(Err(TaskError::TimedOut(limit))),
                    None => task.await,
                }
            };
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(TaskError::Cancelled),
                result = bounded => result,
            }
        });
        handles.push((label, Some(handle)));
    }

    let mut outcomes = Vec::with_capacity(total);
    for (item, handle) in handles {
        let result = match handle {
            None => Err(TaskError::Cancelled),
            Some(handle) => match handle.await {
                Ok(result) => result,
                Err(err) => Err(TaskError::Panicked(err.to_string())),
            },
        };
        if let Err(err) = &result {
            tracing::debug!(%phase, item = %item, error = %err, "task failed");
        }
        outcomes.push(TaskOutcome { item, result });
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(
        %phase,
        completed = total - failed,
        failed,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "phase joined"
    );
    outcomes
}
