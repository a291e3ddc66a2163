//! Blocking HTTP catalog client.
//!
//! Authenticates with the username/app-password pair from process
//! configuration via a basic-auth header. All calls are synchronous; the run
//! loop has no concurrency to coordinate with.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ureq::Agent;

use repowatch_core::config::ProviderConfig;
use repowatch_core::types::{RemoteBranch, RemoteRepository, RepoSlug};

use crate::error::ProviderError;
use crate::wire::{collect_pages, parse_branch_page, parse_repo_page};
use crate::RepoCatalog;

/// Catalog client for a Bitbucket-style workspace API.
pub struct ProviderClient {
    agent: Agent,
    auth_header: String,
    api_base: String,
    workspace: String,
}

impl ProviderClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            agent: Agent::new(),
            auth_header: basic_auth_header(&config.username, &config.app_password),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            workspace: config.workspace.clone(),
        }
    }

    fn get(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .agent
            .get(url)
            .set("Authorization", &self.auth_header)
            .set("Accept", "application/json")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => ProviderError::Status {
                    status,
                    url: response.get_url().to_string(),
                },
                other => ProviderError::Transport(Box::new(other)),
            })?;
        response
            .into_string()
            .map_err(|e| ProviderError::Malformed(format!("unreadable response body: {e}")))
    }
}

impl RepoCatalog for ProviderClient {
    fn list_repositories(&self) -> Result<Vec<RemoteRepository>, ProviderError> {
        let first = format!("{}/repositories/{}", self.api_base, self.workspace);
        let repos = collect_pages(first, |url| {
            let body = self.get(url)?;
            parse_repo_page(&body)
        })?;
        tracing::debug!("catalog listed {} repositories", repos.len());
        Ok(repos)
    }

    fn list_branches(&self, slug: &RepoSlug) -> Result<Vec<RemoteBranch>, ProviderError> {
        let first = format!(
            "{}/repositories/{}/{}/refs/branches",
            self.api_base, self.workspace, slug
        );
        collect_pages(first, |url| {
            let body = self.get(url)?;
            parse_branch_page(&body)
        })
    }
}

fn basic_auth_header(username: &str, app_password: &str) -> String {
    let credentials = STANDARD.encode(format!("{username}:{app_password}"));
    format!("Basic {credentials}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_encodes_pair() {
        // "user:pass" -> dXNlcjpwYXNz
        assert_eq!(basic_auth_header("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn client_trims_trailing_slash_from_base() {
        let config = ProviderConfig {
            username: "u".to_string(),
            app_password: "p".to_string(),
            workspace: "acme".to_string(),
            api_base: "https://api.example.test/2.0/".to_string(),
        };
        let client = ProviderClient::new(&config);
        assert_eq!(client.api_base, "https://api.example.test/2.0");
    }
}
