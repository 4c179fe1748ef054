//! `pagegen build`: run all three phases and print the report.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use pagegen_pipeline::{BuildReport, Orchestrator, WriteResult};

use super::ConfigArgs;

/// Arguments for `pagegen build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Render everything but write nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let mut orchestrator = Orchestrator::from_config(&config, self.dry_run);

        let cancel = orchestrator.cancel_token();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received; cancelling build");
                cancel.cancel();
            }
        });
        let result = orchestrator.run().await;
        interrupt.abort();
        let report = result.context("build failed")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize build report")?
            );
        } else {
            print_summary(&report);
        }
        Ok(())
    }
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "phase")]
    phase: String,
    #[tabled(rename = "item")]
    item: String,
    #[tabled(rename = "error")]
    error: String,
}

fn print_summary(report: &BuildReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if report.writes.is_empty() && report.failures.is_empty() {
        println!("{prefix}{} nothing to build", "✓".green());
    } else {
        println!(
            "{prefix}{} {} page(s) ({} written, {} unchanged) in {}ms",
            "✓".green(),
            report.documents_generated(),
            report.written(),
            report.unchanged(),
            report.elapsed.as_millis(),
        );
    }

    for write in &report.writes {
        let glyph = match write {
            WriteResult::Written { .. } => "✎",
            WriteResult::WouldWrite { .. } => "~",
            WriteResult::Unchanged { .. } => "·",
        };
        println!("  {glyph}  {}", write.path().display());
    }

    if !report.skipped_attributes.is_empty() {
        println!(
            "{} {} attribute value(s) had no content and were left as placeholders",
            "!".yellow(),
            report.skipped_attributes.len()
        );
    }

    if !report.failures.is_empty() {
        println!("{}", "Failed tasks".red().bold());
        let rows: Vec<FailureRow> = report
            .failures
            .iter()
            .map(|f| FailureRow {
                phase: f.phase.to_string(),
                item: f.item.clone(),
                error: f.error.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if report.cancelled {
        println!(
            "{} build cancelled; {} task(s) skipped, output is partial",
            "!".yellow(),
            report.cancelled_tasks
        );
    }
}
