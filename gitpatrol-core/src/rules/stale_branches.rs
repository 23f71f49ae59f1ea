//! Branches must have recent commits.

use chrono::{Duration, Utc};

use crate::error::Result;
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{LAST_TOUCH_DATE_FORMAT, Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};

const BRANCHES: &str = "Branches";
const WITH_RECENT_COMMITS: &str = "WithRecentCommits";

/// Flags branches whose tip commit is older than the threshold.
pub struct StaleBranchesRule {
    context: RuleContext,
    days_since_last_commit: i64,
}

impl StaleBranchesRule {
    /// Create the rule with the staleness threshold in days.
    pub fn new(context: RuleContext, days_since_last_commit: i64) -> Self {
        Self {
            context,
            days_since_last_commit,
        }
    }
}

impl Rule for StaleBranchesRule {
    fn name(&self) -> &'static str {
        "StaleBranchesRule"
    }

    fn rule_message(&self) -> String {
        format!(
            "Branch should have a commit within the last {} days.",
            self.days_since_last_commit
        )
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("branchesWithRecentCommits");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let cutoff = Utc::now() - Duration::days(self.days_since_last_commit);

        for repo in self.context.targets.resolve(source)? {
            let branches = source.branches(&repo)?;
            // A repository holding nothing but its default branch is skipped.
            if branches.len() <= 1 {
                continue;
            }

            let repo_full_name = repo.full_name.as_str();
            for branch in branches.values() {
                if branch.name.eq_ignore_ascii_case(&repo.default_branch) {
                    continue;
                }

                let commit = source.commit(&repo, &branch.sha)?;
                let is_stale = commit.date < cutoff;
                if is_stale {
                    report.push_violation(Violation::stale_object(
                        repo.org_name(),
                        repo_full_name,
                        owner_username(ownership, repo_full_name),
                        &branch.name,
                        &commit.committer_email,
                        commit.date.format(LAST_TOUCH_DATE_FORMAT).to_string(),
                    ));
                }

                tracker.add_hit_to_repo(repo_full_name, !is_stale);
            }

            add_standard_statistics(
                &mut report,
                StatsLevel::Repository,
                &tracker,
                repo_full_name,
                BRANCHES,
                WITH_RECENT_COMMITS,
                ownership,
            );
        }

        for org_name in tracker.orgs_with_hits() {
            add_standard_statistics(
                &mut report,
                StatsLevel::Organization,
                &tracker,
                &org_name,
                BRANCHES,
                WITH_RECENT_COMMITS,
                ownership,
            );
        }

        Ok(report)
    }
}
