//! Scaffold CLI - drive the e2e harness from the shell.

use anyhow::Result;
use clap::{Parser, Subcommand};
use scaffold_core::CliVariant;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Scaffold and inspect e2e temp projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Monorepo root holding node_modules, build/packages and tmp/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// CLI variant (nx, angular). Defaults to SELECTED_CLI, then nx
    #[arg(long, global = true)]
    cli: Option<CliVariant>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recreate the temp project, building the backup if needed
    Prepare,
    /// Create the temp project only if it is missing
    Ensure,
    /// Remove the temp project
    Clean {
        /// Also remove the backup project
        #[arg(long)]
        backup: bool,
    },
    /// Copy the monorepo's node_modules into the temp project
    Vendor,
    /// Run the workspace CLI inside the temp project
    Run {
        /// Return stdout of a failing command instead of an error
        #[arg(long)]
        silence_error: bool,
        /// Arguments passed to the CLI
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Run the Angular CLI inside the temp project
    Ng {
        /// Return stdout of a failing command instead of an error
        #[arg(long)]
        silence_error: bool,
        /// Arguments passed to ng
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
    /// Check that files exist in the temp project
    Check {
        /// Check that the files do not exist instead
        #[arg(long)]
        absent: bool,
        /// Paths relative to the temp project (or absolute)
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Print the temp project layout
    Paths,
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let target = commands::Target::resolve(cli.root, cli.cli)?;

    match cli.command {
        Commands::Prepare => commands::prepare::run(&target),
        Commands::Ensure => commands::prepare::ensure(&target),
        Commands::Clean { backup } => commands::clean::run(&target, backup),
        Commands::Vendor => commands::vendor::run(&target),
        Commands::Run {
            silence_error,
            args,
        } => commands::run::cli(&target, &args, silence_error),
        Commands::Ng {
            silence_error,
            args,
        } => commands::run::ng(&target, &args, silence_error),
        Commands::Check { absent, files } => commands::check::run(&target, &files, absent),
        Commands::Paths => commands::paths::run(&target),
    }
}
