//! Repositories must have recent commits on their default branch.

use chrono::{Duration, Utc};

use crate::error::Result;
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{LAST_TOUCH_DATE_FORMAT, Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};

const REPOS: &str = "Repos";
const WITH_RECENT_COMMITS: &str = "WithRecentCommits";

/// Flags repositories whose default branch has gone quiet.
pub struct StaleRepositoriesRule {
    context: RuleContext,
    days_since_last_commit: i64,
}

impl StaleRepositoriesRule {
    /// Create the rule with the staleness threshold in days.
    pub fn new(context: RuleContext, days_since_last_commit: i64) -> Self {
        Self {
            context,
            days_since_last_commit,
        }
    }
}

impl Rule for StaleRepositoriesRule {
    fn name(&self) -> &'static str {
        "StaleRepositoriesRule"
    }

    fn rule_message(&self) -> String {
        format!(
            "Repositories should have a commit within the last {} days.",
            self.days_since_last_commit
        )
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("reposWithRecentCommits");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let cutoff = Utc::now() - Duration::days(self.days_since_last_commit);

        for repo in self.context.targets.resolve(source)? {
            let repo_full_name = repo.full_name.as_str();
            // A repository with no commits at all has nothing to go stale.
            let stale = match source.latest_commit(&repo)? {
                Some(commit) if commit.date < cutoff => {
                    report.push_violation(Violation::stale_object(
                        repo.org_name(),
                        repo_full_name,
                        owner_username(ownership, repo_full_name),
                        repo_full_name,
                        &commit.committer_email,
                        commit.date.format(LAST_TOUCH_DATE_FORMAT).to_string(),
                    ));
                    true
                }
                _ => false,
            };

            tracker.add_hit_to_repo(repo_full_name, !stale);
        }

        for org_name in tracker.orgs_with_hits() {
            add_standard_statistics(
                &mut report,
                StatsLevel::Organization,
                &tracker,
                &org_name,
                REPOS,
                WITH_RECENT_COMMITS,
                ownership,
            );
        }

        Ok(report)
    }
}
