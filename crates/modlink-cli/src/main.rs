//! Modlink command-line tool
//!
//! Front end over the modlink library: resolve a workspace's module
//! graph, inspect include-path closures, and export the graph for an
//! external build orchestrator.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "modlink")]
#[command(about = "Module descriptor and build-graph tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace root (defaults to the nearest modlink.toml upward)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Target platform (overrides modlink.toml)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Build configuration (overrides modlink.toml)
    #[arg(long, global = true)]
    configuration: Option<String>,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the module graph and report problems
    Check {
        /// Also verify declared include paths exist on disk
        #[arg(long)]
        paths: bool,
    },

    /// List declared modules in build order
    List,

    /// Print a module's include-path closure
    Includes {
        /// Module name
        module: String,
        /// Show exported paths instead of compile-visible paths
        #[arg(long)]
        exported: bool,
    },

    /// Export the resolved graph as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let color = output::resolve_color_choice(Some(cli.color.as_str()));

    match cli.command {
        Commands::Check { paths } => commands::check::execute(
            cli.root,
            cli.platform.as_deref(),
            cli.configuration.as_deref(),
            paths,
            color,
        ),
        Commands::List => commands::list::execute(
            cli.root,
            cli.platform.as_deref(),
            cli.configuration.as_deref(),
            color,
        ),
        Commands::Includes { module, exported } => commands::includes::execute(
            cli.root,
            cli.platform.as_deref(),
            cli.configuration.as_deref(),
            &module,
            exported,
            color,
        ),
        Commands::Export { output, pretty } => commands::export::execute(
            cli.root,
            cli.platform.as_deref(),
            cli.configuration.as_deref(),
            output,
            pretty,
        ),
    }
}
