//! Repowatch — repository mirroring and secret-scan dispatch CLI.
//!
//! # Usage
//!
//! ```text
//! repowatch run [--no-scan] [--announce]
//! repowatch status [--json]
//! repowatch sweep
//! repowatch notify send-message <text>
//! repowatch notify send-file <path> <context>
//! ```
//!
//! Credentials and endpoints come from the environment (a `.env` file is
//! loaded when present); see `Config::from_env` in `repowatch-core`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{notify::NotifyCommand, run::RunArgs, status::StatusArgs, sweep::SweepArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "repowatch",
    version,
    about = "Mirror Bitbucket repositories and dispatch secret scans on change",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync the full catalog: mirror changes and scan what changed.
    Run(RunArgs),

    /// Show the tracked repositories and their last observed commits.
    Status(StatusArgs),

    /// Scan every mirror wholesale and report per repository.
    Sweep(SweepArgs),

    /// Send messages or files to the configured chat channel.
    Notify {
        #[command(subcommand)]
        command: NotifyCommand,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Sweep(args) => args.run(),
        Commands::Notify { command } => commands::notify::run(command),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
