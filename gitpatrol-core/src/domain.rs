//! Domain entities for GitPatrol.
//!
//! These are the narrow views over source-hosting data that the rules need:
//! no full commit object model, just the fields the policy checks read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Splits an organization name off a full repository name (`"org/repo"`).
///
/// Returns the whole input when no `/` is present.
pub fn org_from_repo_name(repo_full_name: &str) -> &str {
    repo_full_name
        .split_once('/')
        .map(|(org, _)| org)
        .unwrap_or(repo_full_name)
}

/// A user of git, tracked by username and email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitUser {
    /// The user's login name.
    pub username: String,
    /// The user's email address.
    pub email: String,
}

impl GitUser {
    /// Create a new user.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// A repository targeted for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Full name of the repository, e.g. `OMDev/omapi`.
    pub full_name: String,
    /// Name of the default branch, e.g. `master`.
    pub default_branch: String,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            default_branch: "master".to_string(),
        }
    }
}

impl Repository {
    /// Create a repository handle.
    pub fn new(full_name: impl Into<String>, default_branch: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            default_branch: default_branch.into(),
        }
    }

    /// The organization portion of the full name.
    pub fn org_name(&self) -> &str {
        org_from_repo_name(&self.full_name)
    }
}

/// A single commit, a node in the repository's history DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit SHA.
    pub sha: String,
    /// Name of the committer.
    pub committer_name: String,
    /// Email address of the committer.
    pub committer_email: String,
    /// Committer timestamp.
    pub date: DateTime<Utc>,
    /// The full commit message.
    pub message: String,
    /// SHAs of the parent commits; empty for a root commit.
    #[serde(default)]
    pub parent_shas: Vec<String>,
}

/// A branch head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// The branch name.
    pub name: String,
    /// SHA of the commit the branch points at.
    pub sha: String,
}

/// The open/closed state of a pull request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// The pull request is still open.
    Open,
    /// The pull request has been closed (merged or abandoned).
    Closed,
}

/// A pull request, reduced to the fields the rules consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number within the repository.
    pub number: u64,
    /// The pull request title.
    pub title: String,
    /// Whether the pull request is open or closed.
    pub state: PullRequestState,
    /// When the pull request was closed, if it has been.
    pub closed_at: Option<DateTime<Utc>>,
    /// SHA of the head commit of the pull request.
    pub head_sha: String,
    /// SHAs of the commits that make up the pull request, most recent first.
    #[serde(default)]
    pub commit_shas: Vec<String>,
    /// Committer name on the most recent commit, if any commits exist.
    #[serde(default)]
    pub last_committer: Option<String>,
}

/// A file at the root of a repository tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFile {
    /// The file name, e.g. `README.md`.
    pub name: String,
    /// The file contents.
    pub content: String,
}

/// A single file matched by a content search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMatch {
    /// The path of the matching file within the repository.
    pub path: String,
}
