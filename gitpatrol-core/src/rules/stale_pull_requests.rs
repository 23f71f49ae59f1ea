//! Open pull requests must be actively worked on.

use chrono::{DateTime, Utc};

use crate::domain::PullRequestState;
use crate::error::Result;
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{LAST_TOUCH_DATE_FORMAT, Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};

const PULL_REQUESTS: &str = "PullRequests";
const WITH_RECENT_COMMITS: &str = "WithRecentCommits";

/// Flags open pull requests whose head commit is older than the threshold.
pub struct StalePullRequestsRule {
    context: RuleContext,
    days_since_last_commit: i64,
}

impl StalePullRequestsRule {
    /// Create the rule with the staleness threshold in days.
    pub fn new(context: RuleContext, days_since_last_commit: i64) -> Self {
        Self {
            context,
            days_since_last_commit,
        }
    }

    fn is_stale(&self, head_commit_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - head_commit_date).num_days() > self.days_since_last_commit
    }
}

impl Rule for StalePullRequestsRule {
    fn name(&self) -> &'static str {
        "StalePullRequestsRule"
    }

    fn rule_message(&self) -> String {
        format!(
            "Open pull requests should have a commit within the last {} days.",
            self.days_since_last_commit
        )
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("pullRequestsWithRecentCommits");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let now = Utc::now();

        for repo in self.context.targets.resolve(source)? {
            let repo_full_name = repo.full_name.as_str();
            let mut saw_open_pr = false;

            for pr in source.pull_requests(&repo, PullRequestState::Open)? {
                saw_open_pr = true;

                let head = source.commit(&repo, &pr.head_sha)?;
                let stale = self.is_stale(head.date, now);
                if stale {
                    let last_committer = pr
                        .last_committer
                        .as_deref()
                        .unwrap_or("unavailable")
                        .to_string();
                    report.push_violation(Violation::stale_object(
                        repo.org_name(),
                        repo_full_name,
                        owner_username(ownership, repo_full_name),
                        format!("{}/pull/{}", repo_full_name, pr.number),
                        last_committer,
                        head.date.format(LAST_TOUCH_DATE_FORMAT).to_string(),
                    ));
                }

                tracker.add_hit_to_repo(repo_full_name, !stale);
            }

            if saw_open_pr {
                add_standard_statistics(
                    &mut report,
                    StatsLevel::Repository,
                    &tracker,
                    repo_full_name,
                    PULL_REQUESTS,
                    WITH_RECENT_COMMITS,
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
                PULL_REQUESTS,
                WITH_RECENT_COMMITS,
                ownership,
            );
        }

        Ok(report)
    }
}
