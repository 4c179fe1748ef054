//! The orchestrator: load inputs, run load/render/write, report.
//!
//! Each phase is a full fan-out followed by a join (see [`run_phase`]), so
//! every effect of phase N is visible before phase N+1 issues its first
//! task. Phase 2 works from the IDs actually present in the attribute store,
//! phase 3 from the filenames actually present in the build store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use pagegen_core::{
    AttributeName, BuildConfig, ContentSource, DirectorySource, EntityId, InputError,
    SubstitutionMode, Template,
};
use pagegen_renderer::TemplateEngine;

use crate::error::{PipelineError, TaskError};
use crate::loader::load_entity;
use crate::pool::{run_phase, PoolOptions};
use crate::render::{render_entity, RenderOutcome};
use crate::report::{BuildReport, TaskFailure};
use crate::state::{Phase, PipelineState};
use crate::store::{AttributeStore, BuildStore};
use crate::writer::OutputWriter;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// The parts of a [`BuildConfig`] the orchestrator itself needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub output_dir: PathBuf,
    pub output_extension: String,
    pub substitution: SubstitutionMode,
    pub pool: PoolOptions,
    pub dry_run: bool,
}

impl BuildSettings {
    pub fn from_config(config: &BuildConfig) -> Self {
        BuildSettings {
            output_dir: config.output_dir.clone(),
            output_extension: config.output_extension.clone(),
            substitution: config.substitution,
            pool: PoolOptions {
                limit: config.worker_limit(),
                task_timeout: config.task_timeout(),
            },
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

struct Inputs {
    ids: Vec<EntityId>,
    names: Arc<[AttributeName]>,
    template: Template,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Owns both stores for the lifetime of one run.
///
/// Workers only ever receive cloned store handles, which point at the
/// orchestrator's maps.
pub struct Orchestrator {
    source: Arc<dyn ContentSource>,
    settings: BuildSettings,
    attributes: AttributeStore,
    builds: BuildStore,
    cancel: CancellationToken,
    state: PipelineState,
}

impl Orchestrator {
    pub fn new(source: Arc<dyn ContentSource>, settings: BuildSettings) -> Self {
        Orchestrator {
            source,
            settings,
            attributes: AttributeStore::new(),
            builds: BuildStore::new(),
            cancel: CancellationToken::new(),
            state: PipelineState::Idle,
        }
    }

    /// Orchestrator reading its inputs from the files named in `config`.
    pub fn from_config(config: &BuildConfig, dry_run: bool) -> Self {
        Self::new(
            Arc::new(DirectorySource::from_config(config)),
            BuildSettings::from_config(config).with_dry_run(dry_run),
        )
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Handle that cancels the run from another task or a signal handler.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn builds(&self) -> &BuildStore {
        &self.builds
    }

    /// Run all three phases.
    ///
    /// Only a missing or empty template returns `Err`; everything else is in
    /// the report.
    pub async fn run(&mut self) -> Result<BuildReport, PipelineError> {
        let clock = Instant::now();
        let mut report = BuildReport::new(Utc::now(), self.settings.dry_run);

        self.load_and_render(&mut report).await?;

        self.transition(PipelineState::Phase3Running);
        self.write_phase(&mut report).await;
        self.transition(PipelineState::Done);

        report.cancelled = self.cancel.is_cancelled();
        report.elapsed = clock.elapsed();
        tracing::info!(
            documents = report.documents_generated(),
            written = report.written(),
            unchanged = report.unchanged(),
            failures = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "build finished"
        );
        Ok(report)
    }

    /// Run phases 1 and 2 only, leaving the rendered pages in
    /// [`Orchestrator::builds`]. Nothing is written.
    pub async fn plan(&mut self) -> Result<BuildReport, PipelineError> {
        let clock = Instant::now();
        let mut report = BuildReport::new(Utc::now(), true);
        self.load_and_render(&mut report).await?;
        report.cancelled = self.cancel.is_cancelled();
        report.elapsed = clock.elapsed();
        Ok(report)
    }

    async fn load_and_render(&mut self, report: &mut BuildReport) -> Result<(), PipelineError> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::AlreadyRan(self.state));
        }

        self.transition(PipelineState::LoadingInputs);
        let inputs = match self.load_inputs() {
            Ok(inputs) => inputs,
            Err(err) => {
                tracing::error!(error = %err, "cannot start build");
                self.transition(PipelineState::Failed);
                return Err(err);
            }
        };
        report.entities_requested = inputs.ids.len();

        self.transition(PipelineState::Phase1Running);
        self.load_phase(inputs.ids, inputs.names, report).await;
        self.transition(PipelineState::Phase1Joined);
        report.entities_loaded = self.attributes.len();

        self.transition(PipelineState::Phase2Running);
        self.render_phase(inputs.template, report).await;
        self.transition(PipelineState::Phase2Joined);
        report.documents_rendered = self.builds.len();
        Ok(())
    }

    fn load_inputs(&self) -> Result<Inputs, PipelineError> {
        let template = self
            .source
            .template()
            .map_err(PipelineError::TemplateUnavailable)?;
        if template.is_empty() {
            return Err(PipelineError::TemplateUnavailable(
                InputError::EmptyContent("template"),
            ));
        }

        // A missing list is not fatal: the build just has nothing to do.
        let ids = self.source.entity_ids().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "entity list unavailable; treating as empty");
            Vec::new()
        });
        let names: Vec<AttributeName> = self.source.attribute_names().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "attribute list unavailable; treating as empty");
            Vec::new()
        });

        tracing::info!(
            entities = ids.len(),
            attributes = names.len(),
            template_bytes = template.as_str().len(),
            "inputs loaded"
        );
        Ok(Inputs {
            ids,
            names: names.into(),
            template,
        })
    }

    async fn load_phase(
        &self,
        ids: Vec<EntityId>,
        names: Arc<[AttributeName]>,
        report: &mut BuildReport,
    ) {
        let outcomes = run_phase(Phase::Load, ids, &self.settings.pool, &self.cancel, |entity| {
            load_entity(
                Arc::clone(&self.source),
                Arc::clone(&names),
                self.attributes.clone(),
                self.cancel.clone(),
                entity,
            )
        })
        .await;

        for outcome in outcomes {
            match outcome.result {
                Ok(loaded) => report.skipped_attributes.extend(loaded.skipped),
                Err(err) => record_failure(report, Phase::Load, outcome.item, &err),
            }
        }
    }

    async fn render_phase(&self, template: Template, report: &mut BuildReport) {
        let engine = Arc::new(TemplateEngine::with_mode(template, self.settings.substitution));
        let extension: Arc<str> = Arc::from(self.settings.output_extension.as_str());

        let outcomes = run_phase(
            Phase::Render,
            self.attributes.entity_ids(),
            &self.settings.pool,
            &self.cancel,
            |entity| {
                let engine = Arc::clone(&engine);
                let extension = Arc::clone(&extension);
                let attributes = self.attributes.clone();
                let builds = self.builds.clone();
                let cancel = self.cancel.clone();
                async move {
                    render_entity(&engine, &attributes, &builds, &entity, &extension, &cancel)
                }
            },
        )
        .await;

        for outcome in outcomes {
            match outcome.result {
                Ok(RenderOutcome::Rendered { .. }) => {}
                Ok(RenderOutcome::NotLoaded { entity }) => {
                    tracing::debug!(entity = %entity, "skipped render of unloaded entity");
                }
                Err(err) => record_failure(report, Phase::Render, outcome.item, &err),
            }
        }
    }

    async fn write_phase(&self, report: &mut BuildReport) {
        let writer = OutputWriter::new(&self.settings.output_dir, self.settings.dry_run);

        let outcomes = run_phase(
            Phase::Write,
            self.builds.filenames(),
            &self.settings.pool,
            &self.cancel,
            |filename| {
                let writer = writer.clone();
                let builds = self.builds.clone();
                async move {
                    let Some(document) = builds.snapshot(&filename) else {
                        return Err(TaskError::MissingDocument { filename });
                    };
                    tokio::task::spawn_blocking(move || writer.write(&filename, &document))
                        .await
                        .map_err(|e| TaskError::Panicked(e.to_string()))?
                }
            },
        )
        .await;

        for outcome in outcomes {
            match outcome.result {
                Ok(write) => report.writes.push(write),
                Err(err) => record_failure(report, Phase::Write, outcome.item, &err),
            }
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!(from = %self.state, to = %next, "pipeline state");
        self.state = next;
    }
}

fn record_failure(report: &mut BuildReport, phase: Phase, item: String, err: &TaskError) {
    if matches!(err, TaskError::Cancelled) {
        report.cancelled_tasks += 1;
        return;
    }
    tracing::warn!(%phase, item = %item, error = %err, "task failed");
    report.failures.push(TaskFailure::new(phase, item, err));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
