pub mod build;
pub mod diff;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use pagegen_core::{BuildConfig, SubstitutionMode};

/// Input, output and scheduling options shared by `build` and `diff`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// YAML build config. Flags below override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Entity ID list, one per line.
    #[arg(long, value_name = "FILE")]
    pub ids: Option<PathBuf>,

    /// Attribute-name list, one per line.
    #[arg(long, value_name = "FILE")]
    pub props: Option<PathBuf>,

    /// Template file.
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Directory holding `<entity>-<attribute>.txt` files.
    #[arg(long, value_name = "DIR")]
    pub content_dir: Option<PathBuf>,

    /// Where pages are written.
    #[arg(long, short, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum tasks in flight per phase.
    #[arg(long, short = 'j', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-task timeout in milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// `simultaneous` (default) or `sequential`.
    #[arg(long, value_name = "MODE")]
    pub substitution: Option<SubstitutionArg>,
}

impl ConfigArgs {
    /// The config file (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<BuildConfig> {
        let mut config = match &self.config {
            Some(path) => BuildConfig::load_at(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => BuildConfig::default(),
        };

        if let Some(path) = &self.ids {
            config.ids_file = path.clone();
        }
        if let Some(path) = &self.props {
            config.props_file = path.clone();
        }
        if let Some(path) = &self.template {
            config.template_file = path.clone();
        }
        if let Some(dir) = &self.content_dir {
            config.content_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.concurrency.is_some() {
            config.concurrency = self.concurrency;
        }
        if self.timeout_ms.is_some() {
            config.task_timeout_ms = self.timeout_ms;
        }
        if let Some(mode) = &self.substitution {
            config.substitution = mode.0;
        }

        config.validate().context("invalid build configuration")?;
        Ok(config)
    }
}

/// Thin wrapper so clap can parse [`SubstitutionMode`] from CLI args.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstitutionArg(pub SubstitutionMode);

impl FromStr for SubstitutionArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simultaneous" => Ok(Self(SubstitutionMode::Simultaneous)),
            "sequential" => Ok(Self(SubstitutionMode::Sequential)),
            other => Err(format!(
                "unknown substitution mode '{other}'; expected: simultaneous, sequential"
            )),
        }
    }
}

impl fmt::Display for SubstitutionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
