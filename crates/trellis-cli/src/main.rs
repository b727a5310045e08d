//! Trellis CLI - Render and check component trees from the command line

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, library, render, SourceArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Lazy component resolution for declarative UI trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Log load and resolution activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tree description, loading libraries as needed
    Render {
        /// Path to the tree description (JSON)
        tree: PathBuf,

        #[command(flatten)]
        sources: SourceArgs,

        /// Check props of every node against its contract
        #[arg(long)]
        props_check: bool,

        /// How long to wait for libraries to load
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Render with props checking on; exit non-zero on any diagnostic
    Check {
        /// Path to the tree description (JSON)
        tree: PathBuf,

        #[command(flatten)]
        sources: SourceArgs,

        /// How long to wait for libraries to load
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Fetch a library and show its components and prop contracts
    Library {
        /// Library namespace
        namespace: String,

        #[command(flatten)]
        sources: SourceArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Commands::Render {
            tree,
            sources,
            props_check,
            timeout_ms,
            format,
        } => render::run(render::RenderArgs {
            tree,
            sources,
            props_check,
            timeout_ms,
            format,
        }),
        Commands::Check {
            tree,
            sources,
            timeout_ms,
            format,
        } => check::run(render::RenderArgs {
            tree,
            sources,
            props_check: true,
            timeout_ms,
            format,
        }),
        Commands::Library { namespace, sources } => library::run(&namespace, &sources),
    }
}
