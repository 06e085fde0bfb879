//! CI event payloads (GitHub Actions event JSON).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Event payload as written to `GITHUB_EVENT_PATH`.
///
/// Only the fields the sync engine reads are modelled; everything else in
/// the document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// Pushed commits, oldest first
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Pull request, for `pull_request` events
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
    /// Issue, for `issues` events
    #[serde(default)]
    pub issue: Option<Issue>,
}

/// A pushed commit.
#[derive(Debug, Clone, Deserialize)]
pub struct Commit {
    /// Commit author
    pub author: CommitAuthor,
    /// Full commit message
    pub message: String,
    /// Commit HTML URL
    pub url: String,
}

/// Author of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    /// Author display name
    pub name: String,
}

/// Open/closed state of a pull request or issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
    #[serde(other)]
    Other,
}

/// GitHub user reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    /// Display name (not always present in webhook payloads)
    #[serde(default)]
    pub name: Option<String>,
    /// Login handle
    #[serde(default)]
    pub login: Option<String>,
}

impl User {
    /// Display name, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.login.as_deref())
            .unwrap_or_default()
    }
}

/// Git reference (branch)
#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// A pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// PR title
    #[serde(default)]
    pub title: Option<String>,
    /// Source branch
    #[serde(default)]
    pub head: Option<GitRef>,
    /// PR state
    pub state: ItemState,
    /// PR author
    #[serde(default)]
    pub user: User,
    /// PR HTML URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// PR API URL
    #[serde(default)]
    pub url: Option<String>,
}

/// An issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue title
    #[serde(default)]
    pub title: Option<String>,
    /// Issue state
    pub state: ItemState,
    /// Issue author
    #[serde(default)]
    pub user: User,
    /// Issue HTML URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// Issue API URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Link shared by pull requests and issues: HTML URL, else API URL.
fn link_of<'a>(html_url: Option<&'a str>, url: Option<&'a str>) -> &'a str {
    html_url
        .filter(|u| !u.is_empty())
        .or(url)
        .unwrap_or_default()
}

impl PullRequest {
    #[must_use]
    pub fn link(&self) -> &str {
        link_of(self.html_url.as_deref(), self.url.as_deref())
    }

    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.head.as_ref().map(|h| h.ref_name.as_str())
    }
}

impl Issue {
    #[must_use]
    pub fn link(&self) -> &str {
        link_of(self.html_url.as_deref(), self.url.as_deref())
    }
}

/// The single event shape selected from a payload.
#[derive(Debug, Clone, Copy)]
pub enum SyncEvent<'a> {
    Commits(&'a [Commit]),
    PullRequest(&'a PullRequest),
    Issue(&'a Issue),
    None,
}

impl EventPayload {
    /// Read and parse an event payload from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse event payload {}", path.display()))
    }

    /// Keep only the `max` most recent commits (0 keeps all).
    #[must_use]
    pub fn limit_commits(mut self, max: usize) -> Self {
        if max > 0 && self.commits.len() > max {
            let excess = self.commits.len() - max;
            self.commits.drain(..excess);
        }
        self
    }

    /// Select the event to process: commits, then pull request, then issue.
    #[must_use]
    pub fn select(&self) -> SyncEvent<'_> {
        if !self.commits.is_empty() {
            return SyncEvent::Commits(&self.commits);
        }
        if let Some(pr) = self.pull_request.as_ref().filter(|pr| pr.title.is_some()) {
            return SyncEvent::PullRequest(pr);
        }
        if let Some(issue) = self.issue.as_ref().filter(|issue| issue.title.is_some()) {
            return SyncEvent::Issue(issue);
        }
        SyncEvent::None
    }
}
