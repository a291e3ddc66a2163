//! Provider wire payloads and pure decoding functions.
//!
//! The listing endpoints return `{ values: [...], next: <url>|absent }`
//! envelopes. Decoding is kept free of HTTP concerns so malformed payloads
//! can be exercised directly in tests.

use serde::Deserialize;

use repowatch_core::types::{BranchName, CommitHash, RemoteBranch, RemoteRepository, RepoName, RepoSlug};

use crate::error::ProviderError;

/// One page of a cursor-paginated listing.
#[derive(Debug)]
pub struct Page<T> {
    pub values: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    values: Vec<T>,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoEntry {
    slug: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct BranchEntry {
    name: String,
    target: Option<BranchTarget>,
}

#[derive(Debug, Deserialize)]
struct BranchTarget {
    hash: Option<String>,
}

/// Decode one page of the repository listing.
pub fn parse_repo_page(body: &str) -> Result<Page<RemoteRepository>, ProviderError> {
    let envelope: Envelope<RepoEntry> =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let values = envelope
        .values
        .into_iter()
        .map(|entry| RemoteRepository {
            slug: RepoSlug::from(entry.slug),
            display_name: RepoName::from(entry.name),
        })
        .collect();
    Ok(Page {
        values,
        next: envelope.next,
    })
}

/// Decode one page of a branch listing.
///
/// A branch whose `target.hash` is missing is kept with `head: None`; the
/// decision engine fail-skips the repository if that branch ends up selected.
pub fn parse_branch_page(body: &str) -> Result<Page<RemoteBranch>, ProviderError> {
    let envelope: Envelope<BranchEntry> =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let values = envelope
        .values
        .into_iter()
        .map(|entry| RemoteBranch {
            name: BranchName::from(entry.name),
            head: entry
                .target
                .and_then(|t| t.hash)
                .filter(|h| !h.is_empty())
                .map(CommitHash::from),
        })
        .collect();
    Ok(Page {
        values,
        next: envelope.next,
    })
}

/// Follow `next` cursors until the listing is exhausted.
///
/// `fetch_page` maps a page URL to a decoded [`Page`]; injection keeps the
/// pagination loop testable without HTTP.
pub fn collect_pages<T>(
    first_url: String,
    mut fetch_page: impl FnMut(&str) -> Result<Page<T>, ProviderError>,
) -> Result<Vec<T>, ProviderError> {
    let mut all = Vec::new();
    let mut url = Some(first_url);
    while let Some(current) = url {
        let page = fetch_page(&current)?;
        all.extend(page.values);
        url = page.next;
    }
    Ok(all)
}
