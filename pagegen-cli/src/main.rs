//! pagegen: build one HTML page per entity from a shared template.
//!
//! # Usage
//!
//! ```text
//! pagegen build [--config <file>] [--output-dir <dir>] [--dry-run] [--json]
//! pagegen diff  [--config <file>] [--output-dir <dir>]
//! ```
//!
//! Every input path and scheduling knob can be given in a YAML config file
//! and overridden on the command line.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{build::BuildArgs, diff::DiffArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pagegen",
    version,
    about = "Generate HTML pages from a template and per-entity attribute files",
    long_about = None,
)]
struct Cli {
    /// Log more (`-v` info, `-vv` debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load attributes, render every page and write the results.
    Build(BuildArgs),

    /// Show a unified diff of what `build` would change on disk.
    Diff(DiffArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    match cli.command {
        Commands::Build(args) => args.run().await,
        Commands::Diff(args) => args.run().await,
    }
}
