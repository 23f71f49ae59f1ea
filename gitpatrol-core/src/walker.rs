//! Bounded traversal of a commit's ancestry.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Commit, Repository};
use crate::error::Result;
use crate::source::RepositorySource;

/// Walks a commit's ancestors depth-first, pruned by a time threshold.
///
/// Any commit older than the cutoff ends its branch of the walk without its
/// parents being visited: an old commit's ancestors are assumed irrelevant.
/// This pruning affects correctness, not just cost. No visited set is kept,
/// so a commit reachable via several merge paths is visited (and counted)
/// once per path.
pub struct CommitHistoryWalker<'a> {
    source: &'a dyn RepositorySource,
    cutoff: DateTime<Utc>,
    max_visited: Option<usize>,
}

impl<'a> CommitHistoryWalker<'a> {
    /// Walk commits no older than `threshold_days` before now.
    pub fn new(source: &'a dyn RepositorySource, threshold_days: i64) -> Self {
        Self::with_cutoff(source, Utc::now() - Duration::days(threshold_days))
    }

    /// Walk commits no older than the explicit cutoff instant.
    pub fn with_cutoff(source: &'a dyn RepositorySource, cutoff: DateTime<Utc>) -> Self {
        Self {
            source,
            cutoff,
            max_visited: None,
        }
    }

    /// Stop the walk after visiting at most `max_visited` commits. History
    /// depth is unbounded in principle, so long-lived repositories get a
    /// safety bound.
    pub fn max_visited(mut self, max_visited: usize) -> Self {
        self.max_visited = Some(max_visited);
        self
    }

    /// Collect the starting commit and its ancestors whose committer date is
    /// not older than the cutoff, in depth-first order.
    pub fn recent_commits(&self, repo: &Repository, start_sha: &str) -> Result<Vec<Commit>> {
        let mut assembled = Vec::new();
        let mut pending = vec![start_sha.to_string()];
        let mut visited = 0usize;

        while let Some(sha) = pending.pop() {
            if let Some(bound) = self.max_visited {
                if visited >= bound {
                    break;
                }
            }
            visited += 1;

            let commit = self.source.commit(repo, &sha)?;
            if commit.date < self.cutoff {
                continue;
            }

            // Reverse so parents are explored in provider order.
            for parent in commit.parent_shas.iter().rev() {
                pending.push(parent.clone());
            }
            assembled.push(commit);
        }

        Ok(assembled)
    }

    /// Convenience walk from the tip of the repository's default branch.
    ///
    /// A repository without its default branch yields no commits.
    pub fn recent_default_branch_commits(&self, repo: &Repository) -> Result<Vec<Commit>> {
        let branches = self.source.branches(repo)?;
        match branches.get(&repo.default_branch) {
            Some(branch) => self.recent_commits(repo, &branch.sha),
            None => Ok(Vec::new()),
        }
    }
}
