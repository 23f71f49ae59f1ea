//! Lazily-memoized pull request retrieval for one repository.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{PullRequest, PullRequestState, Repository};
use crate::error::Result;
use crate::source::RepositorySource;

/// A per-repository view of recently closed pull requests.
///
/// The underlying fetch happens at most once per instance; every strategy
/// consulted while processing the repository reuses the cached result.
/// Instances are scoped to one repository within one rule run.
pub struct PullRequestFetcher<'a> {
    source: &'a dyn RepositorySource,
    repo: &'a Repository,
    threshold_days: i64,
    now: DateTime<Utc>,
    cached: Option<Vec<PullRequest>>,
}

impl<'a> PullRequestFetcher<'a> {
    /// Create a fetcher for pull requests closed within `threshold_days`.
    pub fn new(source: &'a dyn RepositorySource, repo: &'a Repository, threshold_days: i64) -> Self {
        Self::with_now(source, repo, threshold_days, Utc::now())
    }

    /// Create a fetcher evaluating "recently closed" against a fixed instant.
    pub fn with_now(
        source: &'a dyn RepositorySource,
        repo: &'a Repository,
        threshold_days: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            source,
            repo,
            threshold_days,
            now,
            cached: None,
        }
    }

    /// Closed pull requests whose close date falls within the threshold.
    /// Fetched on first call, memoized afterwards.
    pub fn recently_closed(&mut self) -> Result<&[PullRequest]> {
        if self.cached.is_none() {
            let pull_requests = self
                .source
                .pull_requests(self.repo, PullRequestState::Closed)?
                .into_iter()
                .filter(|pr| match pr.closed_at {
                    Some(closed_at) => {
                        self.now.signed_duration_since(closed_at)
                            < Duration::days(self.threshold_days)
                    }
                    None => false,
                })
                .collect();
            self.cached = Some(pull_requests);
        }
        Ok(self.cached.as_deref().unwrap_or_default())
    }
}
