//! brickarch CLI - flat brick arch layout and drawing
//!
//! Solves the brick layout of a flat arch and draws it to DXF or JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod config;

use args::{ArchArgs, OutputArgs, ReportFormat};

#[derive(Parser, Debug)]
#[command(name = "brickarch")]
#[command(version, about = "Lay out and draw flat brick arches", long_about = None)]
struct Cli {
    /// Job file with [arch] and [output] tables (.toml or .json)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw a flat brick arch
    #[command(visible_aliases = ["flatbrickarch", "flatarch", "fa"])]
    Flat {
        #[command(flatten)]
        arch: ArchArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the solved dimensions of a flat brick arch
    Solve {
        #[command(flatten)]
        arch: ArchArgs,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Flat { arch, output } => commands::flat(config, arch, output),
        Commands::Solve { arch, format } => commands::solve(config, arch, *format),
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
