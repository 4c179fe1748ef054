//! `pagegen diff`: show unified diffs for what `build` would write.

use anyhow::{Context, Result};
use clap::Args;

use pagegen_pipeline::{diff_builds, Orchestrator};

use super::ConfigArgs;

/// Arguments for `pagegen diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl DiffArgs {
    pub async fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let mut orchestrator = Orchestrator::from_config(&config, true);
        orchestrator.plan().await.context("diff failed")?;

        let output_dir = &orchestrator.settings().output_dir;
        let diffs = diff_builds(orchestrator.builds(), output_dir)
            .context("failed to read existing output")?;

        if diffs.is_empty() {
            println!("No differences in {}.", output_dir.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
