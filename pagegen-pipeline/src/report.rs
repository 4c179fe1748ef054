//! Run summary handed back by the orchestrator.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::TaskError;
use crate::loader::SkippedAttribute;
use crate::state::Phase;
use crate::writer::WriteResult;

/// A task that ended in error, kept for the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskFailure {
    pub phase: Phase,
    /// Entity ID (load, render) or filename (write).
    pub item: String,
    pub error: String,
}

impl TaskFailure {
    pub(crate) fn new(phase: Phase, item: String, error: &TaskError) -> Self {
        TaskFailure {
            phase,
            item,
            error: error.to_string(),
        }
    }
}

/// Everything a run did, in one serializable value.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub started_at: DateTime<Utc>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    /// Entity IDs in the input list, duplicates included.
    pub entities_requested: usize,
    /// Distinct entities present in the attribute store after phase 1.
    pub entities_loaded: usize,
    /// Documents present in the build store after phase 2.
    pub documents_rendered: usize,
    pub writes: Vec<WriteResult>,
    pub skipped_attributes: Vec<SkippedAttribute>,
    pub failures: Vec<TaskFailure>,
    /// Tasks skipped or stopped because the run was cancelled.
    pub cancelled_tasks: usize,
    pub cancelled: bool,
    pub dry_run: bool,
}

impl BuildReport {
    pub(crate) fn new(started_at: DateTime<Utc>, dry_run: bool) -> Self {
        BuildReport {
            started_at,
            elapsed: Duration::ZERO,
            entities_requested: 0,
            entities_loaded: 0,
            documents_rendered: 0,
            writes: Vec::new(),
            skipped_attributes: Vec::new(),
            failures: Vec::new(),
            cancelled_tasks: 0,
            cancelled: false,
            dry_run,
        }
    }

    /// Entities whose page is on disk (or would be, in dry-run mode).
    pub fn documents_generated(&self) -> usize {
        self.writes.len()
    }

    pub fn written(&self) -> usize {
        self.count(|w| matches!(w, WriteResult::Written { .. } | WriteResult::WouldWrite { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|w| matches!(w, WriteResult::Unchanged { .. }))
    }

    /// Failures from the write phase only.
    pub fn write_failures(&self) -> impl Iterator<Item = &TaskFailure> {
        self.failures.iter().filter(|f| f.phase == Phase::Write)
    }

    fn count(&self, pred: impl Fn(&WriteResult) -> bool) -> usize {
        self.writes.iter().filter(|w| pred(w)).count()
    }
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn counts_split_by_write_status() {
        let mut report = BuildReport::new(Utc::now(), false);
        report.writes = vec![
            WriteResult::Written { path: PathBuf::from("a.html") },
            WriteResult::Unchanged { path: PathBuf::from("b.html") },
            WriteResult::Written { path: PathBuf::from("c.html") },
        ];
        assert_eq!(report.documents_generated(), 3);
        assert_eq!(report.written(), 2);
        assert_eq!(report.unchanged(), 1);
    }

    #[test]
    fn json_shape() {
        let mut report = BuildReport::new(Utc::now(), true);
        report.elapsed = Duration::from_millis(1500);
        report.writes.push(WriteResult::WouldWrite { path: PathBuf::from("a.html") });
        report.failures.push(TaskFailure::new(
            Phase::Write,
            "b.html".into(),
            &TaskError::MissingDocument { filename: "b.html".into() },
        ));

        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["elapsed_ms"], 1500);
        assert_eq!(json["dry_run"], true);
        assert_eq!(json["writes"][0]["status"], "would_write");
        assert_eq!(json["failures"][0]["phase"], "write");
        assert_eq!(report.write_failures().count(), 1);
    }
}
