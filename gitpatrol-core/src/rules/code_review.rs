//! Commits must carry evidence of a code review.

use crate::error::Result;
use crate::fetcher::PullRequestFetcher;
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::review::{ReviewStrategy, chain_approves, default_review_strategies};
use crate::rule::{Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};
use crate::walker::CommitHistoryWalker;

const COMMITS: &str = "Commits";
const WITH_VALID_CODE_REVIEWS: &str = "WithValidCodeReviews";

/// Flags default-branch commits that no review strategy can vouch for.
pub struct CodeReviewRule {
    context: RuleContext,
    threshold_days: i64,
    strategies: Vec<Box<dyn ReviewStrategy>>,
}

impl CodeReviewRule {
    /// Create the rule with the default strategy chain.
    pub fn new(context: RuleContext, threshold_days: i64) -> Self {
        Self::with_strategies(context, threshold_days, default_review_strategies())
    }

    /// Create the rule with an explicit, ordered strategy chain.
    pub fn with_strategies(
        context: RuleContext,
        threshold_days: i64,
        strategies: Vec<Box<dyn ReviewStrategy>>,
    ) -> Self {
        Self {
            context,
            threshold_days,
            strategies,
        }
    }
}

impl Rule for CodeReviewRule {
    fn name(&self) -> &'static str {
        "CodeReviewRule"
    }

    fn rule_message(&self) -> String {
        "Commit must have a \"reviewed by\" in the comment or must be associated with a Jira ticket."
            .to_string()
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("commitsWithValidCodeReviews");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let walker = CommitHistoryWalker::new(source, self.threshold_days);

        for repo in self.context.targets.resolve(source)? {
            let repo_full_name = repo.full_name.as_str();
            let commits = walker.recent_default_branch_commits(&repo)?;
            // One fetcher per repository; every strategy shares its cache.
            let mut pull_requests = PullRequestFetcher::new(source, &repo, self.threshold_days);

            for commit in &commits {
                let reviewed = chain_approves(&self.strategies, commit, &mut pull_requests)?;
                if !reviewed {
                    report.push_violation(Violation::generic(
                        repo.org_name(),
                        repo_full_name,
                        owner_username(ownership, repo_full_name),
                    ));
                }
                tracker.add_hit_to_repo(repo_full_name, reviewed);
            }

            if !commits.is_empty() {
                add_standard_statistics(
                    &mut report,
                    StatsLevel::Repository,
                    &tracker,
                    repo_full_name,
                    COMMITS,
                    WITH_VALID_CODE_REVIEWS,
                    ownership,
                );
            }
        }

        for org_name in tracker.orgs_with_hits() {
            add_standard_statistics(
                &mut report,
                StatsLevel::Organization,
                &tracker,
                &org_name,
                COMMITS,
                WITH_VALID_CODE_REVIEWS,
                ownership,
            );
        }

        Ok(report)
    }
}
