//! Orchestrator lifecycle.
//!
//! ```text
//! Idle -> LoadingInputs -> Phase1Running -> Phase1Joined -> Phase2Running
//!      -> Phase2Joined -> Phase3Running -> Done
//!
//! LoadingInputs -> Failed   (template missing or empty)
//! ```
//!
//! There is no retry or rollback edge. Task failures inside a phase never
//! reach `Failed`.

use std::fmt;

use serde::Serialize;

/// Where an orchestrator is in its single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    LoadingInputs,
    Phase1Running,
    Phase1Joined,
    Phase2Running,
    Phase2Joined,
    Phase3Running,
    Done,
    Failed,
}

impl PipelineState {
    /// Whether `self -> next` is an edge of the lifecycle.
    pub fn can_transition_to(self, next: PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Idle, LoadingInputs)
                | (LoadingInputs, Phase1Running)
                | (LoadingInputs, Failed)
                | (Phase1Running, Phase1Joined)
                | (Phase1Joined, Phase2Running)
                | (Phase2Running, Phase2Joined)
                | (Phase2Joined, Phase3Running)
                | (Phase3Running, Done)
        )
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::LoadingInputs => "loading_inputs",
            PipelineState::Phase1Running => "phase1_running",
            PipelineState::Phase1Joined => "phase1_joined",
            PipelineState::Phase2Running => "phase2_running",
            PipelineState::Phase2Joined => "phase2_joined",
            PipelineState::Phase3Running => "phase3_running",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The three fan-out phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Load,
    Render,
    Write,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Load => write!(f, "load"),
            Phase::Render => write!(f, "render"),
            Phase::Write => write!(f, "write"),
        }
    }
}
