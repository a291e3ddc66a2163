//! Chat notification collaborator.
//!
//! Two operations: a text message and a file upload with context. The Slack
//! implementation posts with a bot token; the Web API reports failures in the
//! response body (`ok: false`) even on HTTP 200, so both layers are checked.

use std::path::Path;

use serde_json::json;
use ureq::Agent;

use repowatch_core::config::ChatConfig;

use crate::error::{io_err, DispatchError};

/// Outbound chat messages and file uploads.
pub trait Notifier {
    fn send_message(&self, text: &str) -> Result<(), DispatchError>;
    fn send_file(&self, path: &Path, context: &str) -> Result<(), DispatchError>;
}

/// Slack Web API notifier.
pub struct Slack {
    agent: Agent,
    bot_token: String,
    channel: String,
    api_base: String,
}

impl Slack {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            agent: Agent::new(),
            bot_token: config.bot_token.clone(),
            channel: config.channel.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    fn check_ok(endpoint: &'static str, body: &str) -> Result<(), DispatchError> {
        let payload: serde_json::Value = serde_json::from_str(body)?;
        if payload["ok"].as_bool() == Some(true) {
            return Ok(());
        }
        let detail = payload["error"]
            .as_str()
            .unwrap_or("unknown error")
            .to_string();
        Err(DispatchError::Api { endpoint, detail })
    }

    fn map_http(endpoint: &'static str, err: ureq::Error) -> DispatchError {
        match err {
            ureq::Error::Status(status, _) => DispatchError::Status { endpoint, status },
            other => DispatchError::Transport {
                endpoint,
                source: Box::new(other),
            },
        }
    }
}

impl Notifier for Slack {
    fn send_message(&self, text: &str) -> Result<(), DispatchError> {
        let endpoint = "chat.postMessage";
        let response = self
            .agent
            .post(&format!("{}/{}", self.api_base, endpoint))
            .set("Authorization", &format!("Bearer {}", self.bot_token))
            .send_json(json!({
                "channel": self.channel,
                "text": text,
            }))
            .map_err(|e| Self::map_http(endpoint, e))?;
        let body = response.into_string().map_err(|e| DispatchError::Api {
            endpoint,
            detail: format!("unreadable response: {e}"),
        })?;
        Self::check_ok(endpoint, &body)
    }

    fn send_file(&self, path: &Path, context: &str) -> Result<(), DispatchError> {
        let endpoint = "files.upload";
        let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "results.txt".to_string());
        let response = self
            .agent
            .post(&format!("{}/{}", self.api_base, endpoint))
            .set("Authorization", &format!("Bearer {}", self.bot_token))
            .send_form(&[
                ("channels", self.channel.as_str()),
                ("content", content.as_str()),
                ("filename", filename.as_str()),
                ("title", &format!("Scan results for {context}")),
                (
                    "initial_comment",
                    &format!("Here are the scan results for {context}."),
                ),
            ])
            .map_err(|e| Self::map_http(endpoint, e))?;
        let body = response.into_string().map_err(|e| DispatchError::Api {
            endpoint,
            detail: format!("unreadable response: {e}"),
        })?;
        Self::check_ok(endpoint, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_true_passes() {
        assert!(Slack::check_ok("chat.postMessage", r#"{"ok": true}"#).is_ok());
    }

    #[test]
    fn ok_false_surfaces_the_api_error() {
        let err = Slack::check_ok(
            "chat.postMessage",
            r#"{"ok": false, "error": "channel_not_found"}"#,
        )
        .expect_err("ok=false should fail");
        assert!(err.to_string().contains("channel_not_found"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(Slack::check_ok("files.upload", "<html>").is_err());
    }
}
