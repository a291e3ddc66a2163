//! `repowatch sweep` — scan every mirror wholesale.
//!
//! Unlike `run`, the sweep ignores the state store and diffs entirely: every
//! mirror directory is scanned top to bottom and the results are reported per
//! repository. Useful after tuning scanner rules or for a periodic audit.

use anyhow::{Context, Result};
use clap::Args;

use repowatch_core::config::Config;
use repowatch_dispatch::{
    Dispatcher, EscalationContext, Jira, Notifier, ProjectKeyMap, Slack, TruffleHog,
};

/// Arguments for `repowatch sweep`.
#[derive(Args, Debug)]
pub struct SweepArgs {}

impl SweepArgs {
    pub fn run(self) -> Result<()> {
        let config = Config::from_env().context("incomplete environment")?;
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

        let summary = dispatcher.sweep().context("sweep failed")?;
        println!(
            "Swept {} mirrors, {} with findings.",
            summary.scanned_dirs, summary.with_findings
        );

        let notifier = Slack::new(&config.chat);
        if let Err(err) = notifier.send_message(&format!(
            ":white_check_mark: Sweep complete — {} mirrors scanned, {} with findings.",
            summary.scanned_dirs, summary.with_findings
        )) {
            tracing::warn!("failed to announce sweep completion: {err}");
        }
        Ok(())
    }
}
