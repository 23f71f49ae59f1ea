//! Recordable report entries: violations and statistics.
//!
//! Everything a rule emits is rendered to a single log-friendly line by the
//! recorder, so both kinds carry the same org/repo/owner scope fields and
//! implement [`std::fmt::Display`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Variant payload distinguishing the kinds of policy violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ViolationDetail {
    /// A bare violation with no extra context.
    Generic,
    /// A commit that violates a rule.
    #[serde(rename_all = "camelCase")]
    BadCommit {
        /// Name of the committer.
        committer: String,
        /// SHA of the offending commit.
        commit_sha: String,
        /// Relative URL of the commit, `/<repo>/commit/<sha>`.
        commit_url: String,
    },
    /// A commit whose message contains profane terms.
    #[serde(rename_all = "camelCase")]
    CommitWithProfanity {
        /// Name of the committer.
        committer: String,
        /// SHA of the offending commit.
        commit_sha: String,
        /// Relative URL of the commit.
        commit_url: String,
        /// Matched profane terms, in scan order.
        terms: Vec<String>,
    },
    /// A file whose contents matched profane terms.
    #[serde(rename_all = "camelCase")]
    FileWithProfanity {
        /// Path of the offending file within the repository.
        path: String,
        /// Matched profane terms, in scan order.
        terms: Vec<String>,
    },
    /// A branch, pull request, or repository with no recent activity.
    #[serde(rename_all = "camelCase")]
    StaleObject {
        /// Identifier of the stale entity (branch name, PR path, repo name).
        object_name: String,
        /// Who last touched the entity.
        last_committer: String,
        /// Date of the last commit, formatted `yyyy-MM-dd`.
        last_commit_date: String,
    },
}

/// A rule violation scoped to an organization, repository, and owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Name of the owning organization.
    pub org_name: String,
    /// Full name of the repository, e.g. `OMDev/omapi`.
    pub repo_full_name: String,
    /// Username of the repository owner, or `unknown`.
    pub repo_owner: String,
    /// The violation-specific payload.
    #[serde(flatten)]
    pub detail: ViolationDetail,
}

impl Violation {
    /// Create a violation with no extra context.
    pub fn generic(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            repo_full_name: repo_full_name.into(),
            repo_owner: repo_owner.into(),
            detail: ViolationDetail::Generic,
        }
    }

    /// Create a bad-commit violation; the commit URL is derived from the
    /// repository name and SHA.
    pub fn bad_commit(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
        committer: impl Into<String>,
        commit_sha: impl Into<String>,
    ) -> Self {
        let repo_full_name = repo_full_name.into();
        let commit_sha = commit_sha.into();
        let commit_url = commit_url(&repo_full_name, &commit_sha);
        Self {
            org_name: org_name.into(),
            repo_full_name,
            repo_owner: repo_owner.into(),
            detail: ViolationDetail::BadCommit {
                committer: committer.into(),
                commit_sha,
                commit_url,
            },
        }
    }

    /// Create a commit-with-profanity violation carrying the matched terms.
    pub fn commit_with_profanity(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
        committer: impl Into<String>,
        commit_sha: impl Into<String>,
        terms: Vec<String>,
    ) -> Self {
        let repo_full_name = repo_full_name.into();
        let commit_sha = commit_sha.into();
        let commit_url = commit_url(&repo_full_name, &commit_sha);
        Self {
            org_name: org_name.into(),
            repo_full_name,
            repo_owner: repo_owner.into(),
            detail: ViolationDetail::CommitWithProfanity {
                committer: committer.into(),
                commit_sha,
                commit_url,
                terms,
            },
        }
    }

    /// Create a file-with-profanity violation carrying the matched terms.
    pub fn file_with_profanity(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
        path: impl Into<String>,
        terms: Vec<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            repo_full_name: repo_full_name.into(),
            repo_owner: repo_owner.into(),
            detail: ViolationDetail::FileWithProfanity {
                path: path.into(),
                terms,
            },
        }
    }

    /// Create a stale-object violation.
    pub fn stale_object(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
        object_name: impl Into<String>,
        last_committer: impl Into<String>,
        last_commit_date: impl Into<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            repo_full_name: repo_full_name.into(),
            repo_owner: repo_owner.into(),
            detail: ViolationDetail::StaleObject {
                object_name: object_name.into(),
                last_committer: last_committer.into(),
                last_commit_date: last_commit_date.into(),
            },
        }
    }
}

fn commit_url(repo_full_name: &str, sha: &str) -> String {
    format!("/{repo_full_name}/commit/{sha}")
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type=violation repoFullName={} orgName={} repoOwner={}",
            self.repo_full_name, self.org_name, self.repo_owner
        )?;
        match &self.detail {
            ViolationDetail::Generic => Ok(()),
            ViolationDetail::BadCommit {
                committer,
                commit_sha,
                commit_url,
            } => write!(
                f,
                " committer={committer} commitSHA={commit_sha} commitURL={commit_url}"
            ),
            ViolationDetail::CommitWithProfanity {
                committer,
                commit_sha,
                commit_url,
                terms,
            } => write!(
                f,
                " committer={committer} commitSHA={commit_sha} commitURL={commit_url} profanityList={}",
                terms.join(",")
            ),
            ViolationDetail::FileWithProfanity { path, terms } => {
                write!(f, " fileName={path} profanityList={}", terms.join(","))
            }
            ViolationDetail::StaleObject {
                object_name,
                last_committer,
                last_commit_date,
            } => write!(
                f,
                " staleObjectName={object_name} lastCommitter={last_committer} formattedLastCommitDate={last_commit_date}"
            ),
        }
    }
}

/// A simple key/value statistic scoped like a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    /// Name of the organization the statistic applies to.
    pub org_name: String,
    /// Full repository name, or `n/a` for org-level statistics.
    pub repo_full_name: String,
    /// Owner username, or `n/a` for org-level statistics.
    pub repo_owner: String,
    /// The metric name, e.g. `numberOfBranchesWithRecentCommits`.
    pub key: String,
    /// The metric value, rendered as a string.
    pub value: String,
}

impl Statistic {
    /// Create a statistic.
    pub fn new(
        org_name: impl Into<String>,
        repo_full_name: impl Into<String>,
        repo_owner: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            repo_full_name: repo_full_name.into(),
            repo_owner: repo_owner.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type=statistic repoFullName={} orgName={} repoOwner={} {}={}",
            self.repo_full_name, self.org_name, self.repo_owner, self.key, self.value
        )
    }
}

/// Any entry a rule can hand to the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recordable {
    /// A rule violation.
    Violation(Violation),
    /// A derived statistic.
    Statistic(Statistic),
}

impl fmt::Display for Recordable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Violation(violation) => violation.fmt(f),
            Self::Statistic(statistic) => statistic.fmt(f),
        }
    }
}
