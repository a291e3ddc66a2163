//! `repowatch notify` — direct chat helpers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use repowatch_core::config::Config;
use repowatch_dispatch::{Notifier, Slack};

/// Subcommands for `repowatch notify`.
#[derive(Subcommand, Debug)]
pub enum NotifyCommand {
    /// Send a text message to the configured channel.
    SendMessage {
        /// Message text.
        text: String,
    },

    /// Upload a file to the configured channel.
    SendFile {
        /// Path of the file to upload.
        path: PathBuf,

        /// Repository or context name shown alongside the upload.
        context: String,
    },
}

pub fn run(command: NotifyCommand) -> Result<()> {
    let config = Config::from_env().context("incomplete environment")?;
    let notifier = Slack::new(&config.chat);
    match command {
        NotifyCommand::SendMessage { text } => {
            notifier
                .send_message(&text)
                .context("failed to send the message")?;
            println!("✓ message sent");
        }
        NotifyCommand::SendFile { path, context } => {
            notifier
                .send_file(&path, &context)
                .with_context(|| format!("failed to upload {}", path.display()))?;
            println!("✓ file sent: {}", path.display());
        }
    }
    Ok(())
}
