//! Ticketing collaborator.
//!
//! Narrow interface over a Jira-style REST API: create an issue, read it
//! back, comment on it. Descriptions and comments go over the wire as ADF
//! documents (see [`crate::adf`]).

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use ureq::Agent;

use repowatch_core::config::TicketingConfig;

use crate::adf::to_adf;
use crate::error::DispatchError;

/// Issue identifier assigned by the ticketing system (e.g. `SEC-123`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKey(pub String);

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Details read back for an existing issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetails {
    pub key: IssueKey,
    pub summary: String,
}

/// Ticket creation and follow-up operations.
pub trait Ticketing {
    fn create_issue(
        &self,
        summary: &str,
        description: &str,
        project_key: &str,
        issue_type: &str,
        labels: &[&str],
    ) -> Result<IssueKey, DispatchError>;

    /// `None` when the issue does not exist.
    fn get_issue(&self, key: &IssueKey) -> Result<Option<IssueDetails>, DispatchError>;

    fn add_comment(&self, key: &IssueKey, text: &str) -> Result<(), DispatchError>;
}

/// Jira Cloud REST v3 client.
pub struct Jira {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl Jira {
    pub fn new(config: &TicketingConfig) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", config.email, config.api_token));
        Self {
            agent: Agent::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        }
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

impl Ticketing for Jira {
    fn create_issue(
        &self,
        summary: &str,
        description: &str,
        project_key: &str,
        issue_type: &str,
        labels: &[&str],
    ) -> Result<IssueKey, DispatchError> {
        let endpoint = "issue create";
        let payload = json!({
            "fields": {
                "project": { "key": project_key },
                "summary": summary,
                "description": to_adf(description),
                "issuetype": { "name": issue_type },
                "labels": labels,
            }
        });
        let response = self
            .agent
            .post(&format!("{}/rest/api/3/issue", self.base_url))
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .send_json(payload)
            .map_err(|e| Self::map_http(endpoint, e))?;
        let body: serde_json::Value = response.into_json().map_err(|e| DispatchError::Api {
            endpoint,
            detail: format!("unreadable response: {e}"),
        })?;
        match body["key"].as_str() {
            Some(key) => Ok(IssueKey(key.to_string())),
            None => Err(DispatchError::Api {
                endpoint,
                detail: "response carried no issue key".to_string(),
            }),
        }
    }

    fn get_issue(&self, key: &IssueKey) -> Result<Option<IssueDetails>, DispatchError> {
        let endpoint = "issue get";
        let result = self
            .agent
            .get(&format!("{}/rest/api/3/issue/{}", self.base_url, key))
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .call();
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(err) => return Err(Self::map_http(endpoint, err)),
        };
        let body: serde_json::Value = response.into_json().map_err(|e| DispatchError::Api {
            endpoint,
            detail: format!("unreadable response: {e}"),
        })?;
        let summary = body["fields"]["summary"].as_str().unwrap_or("").to_string();
        Ok(Some(IssueDetails {
            key: key.clone(),
            summary,
        }))
    }

    fn add_comment(&self, key: &IssueKey, text: &str) -> Result<(), DispatchError> {
        let endpoint = "issue comment";
        self.agent
            .post(&format!(
                "{}/rest/api/3/issue/{}/comment",
                self.base_url, key
            ))
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .send_json(json!({ "body": to_adf(text) }))
            .map_err(|e| Self::map_http(endpoint, e))?;
        Ok(())
    }
}
