//! Commits must reference a JIRA ticket.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};
use crate::walker::CommitHistoryWalker;

const JIRA_TAGS: &str = "JiraTags";
const WITH_VALID_JIRA_TAG: &str = "WithValidJiraTag";

// A JIRA tag anywhere in the message, or a release-plugin message, which is
// exempt. Whole-message match with `.` spanning newlines.
static VALID_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(?:.*[A-Z]+-[0-9]+.*|\[(?:maven|grunt)-release-plugin\].*)\z")
        .expect("jira tag pattern")
});

/// Flags commits on the default branch that carry no JIRA tag.
pub struct JiraTagRule {
    context: RuleContext,
    threshold_days: i64,
}

impl JiraTagRule {
    /// Create the rule; only commits within `threshold_days` are checked.
    pub fn new(context: RuleContext, threshold_days: i64) -> Self {
        Self {
            context,
            threshold_days,
        }
    }

    fn is_commit_valid(message: &str) -> bool {
        VALID_MESSAGE.is_match(message)
    }
}

impl Rule for JiraTagRule {
    fn name(&self) -> &'static str {
        "JiraTagRule"
    }

    fn rule_message(&self) -> String {
        "Commit should begin with an associated JIRA tag.".to_string()
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("commitsWithJIRATag");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let walker = CommitHistoryWalker::new(source, self.threshold_days);

        for repo in self.context.targets.resolve(source)? {
            let repo_full_name = repo.full_name.as_str();

            for commit in walker.recent_default_branch_commits(&repo)? {
                let valid = Self::is_commit_valid(&commit.message);
                if !valid {
                    report.push_violation(Violation::bad_commit(
                        repo.org_name(),
                        repo_full_name,
                        owner_username(ownership, repo_full_name),
                        &commit.committer_name,
                        &commit.sha,
                    ));
                }
                tracker.add_hit_to_repo(repo_full_name, valid);
            }

            add_standard_statistics(
                &mut report,
                StatsLevel::Repository,
                &tracker,
                repo_full_name,
                JIRA_TAGS,
                WITH_VALID_JIRA_TAG,
                ownership,
            );
        }

        for org_name in tracker.orgs_with_hits() {
            add_standard_statistics(
                &mut report,
                StatsLevel::Organization,
                &tracker,
                &org_name,
                JIRA_TAGS,
                WITH_VALID_JIRA_TAG,
                ownership,
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::JiraTagRule;
    use crate::domain::{Branch, Commit, Repository};
    use crate::ownership::MockRepoOwnership;
    use crate::recordable::ViolationDetail;
    use crate::rule::Rule;
    use crate::rules::RuleContext;
    use crate::source::{FixtureSource, RepoFixture};
    use crate::targets::TargetRepositories;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    #[test]
    fn recognizes_tagged_and_exempt_messages() {
        for message in [
            "PAY-1567.  Fixed payments with existing mandates and PIs.",
            "OPP-2165 validate refund form for REFUND_BY_TRANSFER",
            "GC-1415: upgaded to base-pom-20, fixed old dependencies",
            "(GC-1561): Make SEPA option the default",
            "GC-1424- code review feedback",
            "[maven-release-plugin] prepare for next development iteration",
            "[grunt-release-plugin] Released pay-prefs-ui 1.7.6",
            "PAY-1541 EPIC: Enable SEPA for Offline Refunds\nAdd new FtActionType",
        ] {
            assert!(JiraTagRule::is_commit_valid(message), "should accept {message:?}");
        }

        for message in [
            "Updating failing test in QuickBuild.",
            "set version back to 1.5-SNAPSHOT",
            "bumped version to 4.3.0-SNAPSHOT",
            "Pass the actual error from omapi to the clients [Reviewed by Daniel]",
            "Ensuring window.logger exists",
            "OMDev/global-cart-thin-ui-endpoint",
        ] {
            assert!(!JiraTagRule::is_commit_valid(message), "should reject {message:?}");
        }
    }

    #[test]
    fn execute_emits_violations_and_standard_statistics() {
        let repo = Repository::new("OMDev/omapi", "master");
        let now = Utc::now();
        let commit = |sha: &str, message: &str, parents: &[&str]| Commit {
            sha: sha.to_string(),
            committer_name: "skhatri".to_string(),
            committer_email: "skhatri@example.com".to_string(),
            date: now - Duration::days(1),
            message: message.to_string(),
            parent_shas: parents.iter().map(|sha| sha.to_string()).collect(),
        };

        let mut source = FixtureSource::new();
        source.insert(RepoFixture {
            repository: repo.clone(),
            commits: vec![
                commit("tip", "OPP-2165 validate refund form", &["base"]),
                commit("base", "bumped version to 4.3.0-SNAPSHOT", &[]),
            ],
            branches: vec![Branch {
                name: "master".to_string(),
                sha: "tip".to_string(),
            }],
            ..Default::default()
        });

        let mut ownership = MockRepoOwnership::new();
        ownership.expect_repository_owner().returning(|_| None);

        let context = RuleContext::new(
            Arc::new(source),
            TargetRepositories::new(vec!["OMDev".to_string()], Vec::new()),
            Arc::new(ownership),
        );
        let rule = JiraTagRule::new(context, 30);
        let report = rule.execute().expect("execute");

        let violations: Vec<_> = report.violations().collect();
        assert_eq!(violations.len(), 1);
        match &violations[0].detail {
            ViolationDetail::BadCommit { commit_sha, .. } => assert_eq!(commit_sha, "base"),
            other => panic!("expected BadCommit, got {other:?}"),
        }

        // 3 repo-level + 3 org-level statistics.
        assert_eq!(report.statistics().count(), 6);
        let percent = report
            .statistics()
            .find(|stat| stat.key == "percentOfJiraTagsWithValidJiraTag")
            .expect("repo percent stat");
        assert_eq!(percent.value, "50");
    }
}
