//! `repowatch run` — one full sync batch over the catalog.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use repowatch_core::config::Config;
use repowatch_core::types::RunSummary;
use repowatch_dispatch::{
    Dispatcher, EscalationContext, Jira, Notifier, ProjectKeyMap, Slack, TruffleHog,
};
use repowatch_provider::ProviderClient;
use repowatch_sync::{dispatch::NullDispatch, pipeline, GitMirror};

/// Arguments for `repowatch run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Mirror changes but do not scan or escalate anything.
    #[arg(long)]
    pub no_scan: bool,

    /// Post the run summary to the chat channel when done.
    #[arg(long)]
    pub announce: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::from_env().context("incomplete environment")?;
        let catalog = ProviderClient::new(&config.provider);
        let mirror = GitMirror::new(config.mirror_root(), &config.provider);

        let summary = if self.no_scan {
            pipeline::run(&config.home, &catalog, &mirror, &NullDispatch)
        } else {
            let mapping = ProjectKeyMap::load(&config.project_keys_path)
                .context("failed to load the project key mapping")?;
            let dispatcher = Dispatcher::new(
                Box::new(TruffleHog::new()),
                Box::new(Slack::new(&config.chat)),
                Box::new(Jira::new(&config.ticketing)),
                mapping,
                EscalationContext {
                    mirror_root: config.mirror_root(),
                    results_dir: config.results_dir(),
                    workspace: config.provider.workspace.clone(),
                    ticket_browse_base: config.ticketing.base_url.trim_end_matches('/').to_string(),
                },
            );
            pipeline::run(&config.home, &catalog, &mirror, &dispatcher)
        }
        .context("sync run failed")?;

        print_summary(&summary);

        if self.announce {
            let notifier = Slack::new(&config.chat);
            notifier
                .send_message(&format!(":mag: Repowatch run finished — {}", summary.headline()))
                .context("failed to announce the run summary")?;
        }
        Ok(())
    }
}

fn print_summary(summary: &RunSummary) {
    println!("{}", summary.headline().bold());
    for name in &summary.new_repos {
        println!("  {}  {name}", "new".green().bold());
    }
    for name in &summary.updated_repos {
        println!("  {}  {name}", "upd".yellow().bold());
    }
    for skipped in &summary.skipped {
        println!(
            "  {}  {} — {}",
            "skip".red().bold(),
            skipped.name,
            skipped.reason
        );
    }
}
