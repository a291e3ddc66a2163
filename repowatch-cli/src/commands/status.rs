//! `repowatch status` — local view of the tracked repository set.
//!
//! Reads only the state store; needs no credentials and touches no network.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use repowatch_core::config::state_home;
use repowatch_core::state;
use repowatch_core::types::RepositoryRecord;

/// Arguments for `repowatch status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let home = state_home().context("could not determine home directory")?;
        let records = state::list_records_at(&home).context("failed to read the state store")?;

        if self.json {
            print_json(&records)?;
            return Ok(());
        }
        print_table(&records);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusJson<'a> {
    summary: StatusSummaryJson,
    repositories: &'a [RepositoryRecord],
}

#[derive(Serialize)]
struct StatusSummaryJson {
    tracked: usize,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "repository")]
    repository: String,
    #[tabled(rename = "branch")]
    branch: String,
    #[tabled(rename = "commit")]
    commit: String,
    #[tabled(rename = "observed")]
    observed: String,
}

fn print_json(records: &[RepositoryRecord]) -> Result<()> {
    let payload = StatusJson {
        summary: StatusSummaryJson {
            tracked: records.len(),
        },
        repositories: records,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(records: &[RepositoryRecord]) {
    println!(
        "Repowatch v{} | {} repositories tracked",
        env!("CARGO_PKG_VERSION"),
        records.len(),
    );

    if records.is_empty() {
        println!("No repositories tracked. Run `repowatch run` first.");
        return;
    }

    let rows: Vec<StatusTableRow> = records
        .iter()
        .map(|record| StatusTableRow {
            repository: record.display_name.0.clone(),
            branch: record.branch.0.clone(),
            commit: record.last_commit.short().to_string(),
            observed: record.observed_at.format("%Y-%m-%d %H:%M %:z").to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!(
        "{}",
        "State advances only after a successful mirror and scan dispatch.".bright_black()
    );
}
