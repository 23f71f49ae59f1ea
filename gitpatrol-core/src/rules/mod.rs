//! The concrete policy rules.

use std::sync::Arc;

use crate::ownership::RepoOwnership;
use crate::source::RepositorySource;
use crate::targets::TargetRepositories;

pub mod code_review;
pub mod jira_tag;
pub mod profanity;
pub mod readme;
pub mod stale_branches;
pub mod stale_pull_requests;
pub mod stale_repositories;

pub use code_review::CodeReviewRule;
pub use jira_tag::JiraTagRule;
pub use profanity::ProfanityRule;
pub use readme::ReadMeRule;
pub use stale_branches::StaleBranchesRule;
pub use stale_pull_requests::StalePullRequestsRule;
pub use stale_repositories::StaleRepositoriesRule;

/// The collaborators every rule evaluates against: the data provider, the
/// repository scope, and the ownership resolver.
#[derive(Clone)]
pub struct RuleContext {
    /// The repository data provider.
    pub source: Arc<dyn RepositorySource + Send + Sync>,
    /// The externally-configured evaluation scope.
    pub targets: TargetRepositories,
    /// Resolves repository owners for violation and statistic attribution.
    pub ownership: Arc<dyn RepoOwnership + Send + Sync>,
}

impl RuleContext {
    /// Bundle the collaborators a rule needs.
    pub fn new(
        source: Arc<dyn RepositorySource + Send + Sync>,
        targets: TargetRepositories,
        ownership: Arc<dyn RepoOwnership + Send + Sync>,
    ) -> Self {
        Self {
            source,
            targets,
            ownership,
        }
    }
}
