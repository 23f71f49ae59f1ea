//! Source files and commit messages must stay free of profane terms.

use regex::Regex;

use crate::domain::Repository;
use crate::error::{PatrolError, Result};
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};
use crate::walker::CommitHistoryWalker;

const PROFANITY: &str = "Profanity";
const IN_SOURCE: &str = "WithProfaneLanguageInSource";
const IN_COMMIT_MSG: &str = "WithProfaneLanguageInCommitMsg";

/// Flags repositories whose files or commit messages contain profanity.
pub struct ProfanityRule {
    context: RuleContext,
    threshold_days: i64,
    terms: Vec<(String, Regex)>,
}

impl ProfanityRule {
    /// Create the rule. Fails fast when the term list is empty or a term is
    /// not a valid pattern.
    pub fn new(context: RuleContext, threshold_days: i64, terms: Vec<String>) -> Result<Self> {
        if terms.is_empty() {
            return Err(PatrolError::Config(
                "profanity rule requires at least one term".to_string(),
            ));
        }
        let terms = terms
            .into_iter()
            .map(|term| {
                let pattern = Regex::new(&term).map_err(|err| {
                    PatrolError::Config(format!("invalid profanity term {term:?}: {err}"))
                })?;
                Ok((term, pattern))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            context,
            threshold_days,
            terms,
        })
    }

    fn check_files(&self, repo: &Repository, report: &mut ReportResult) -> Result<StatsTracker> {
        let mut tracker = StatsTracker::new("reposWithProfanityInSrc");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let repo_full_name = repo.full_name.as_str();

        // Path -> matched terms, preserving the order files were first seen.
        let mut offending: Vec<(String, Vec<String>)> = Vec::new();
        for (term, _) in &self.terms {
            let matches = source.search_content(repo, term)?;
            for hit in &matches {
                match offending.iter_mut().find(|(path, _)| path == &hit.path) {
                    Some((_, terms)) => terms.push(term.clone()),
                    None => offending.push((hit.path.clone(), vec![term.clone()])),
                }
            }
            tracker.add_hit_to_repo(repo_full_name, !matches.is_empty());
        }

        for (path, terms) in offending {
            report.push_violation(Violation::file_with_profanity(
                repo.org_name(),
                repo_full_name,
                owner_username(ownership, repo_full_name),
                path,
                terms,
            ));
        }

        add_standard_statistics(
            report,
            StatsLevel::Repository,
            &tracker,
            repo_full_name,
            PROFANITY,
            IN_SOURCE,
            ownership,
        );
        Ok(tracker)
    }

    fn check_commit_messages(
        &self,
        repo: &Repository,
        report: &mut ReportResult,
    ) -> Result<StatsTracker> {
        let mut tracker = StatsTracker::new("reposWithProfanityInCommitMsg");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();
        let repo_full_name = repo.full_name.as_str();

        let walker = CommitHistoryWalker::new(source, self.threshold_days);
        let commits = walker.recent_default_branch_commits(repo)?;

        for commit in &commits {
            let matched: Vec<String> = self
                .terms
                .iter()
                .filter(|(_, pattern)| pattern.is_match(&commit.message))
                .map(|(term, _)| term.clone())
                .collect();
            let has_profanity = !matched.is_empty();
            if has_profanity {
                report.push_violation(Violation::commit_with_profanity(
                    repo.org_name(),
                    repo_full_name,
                    owner_username(ownership, repo_full_name),
                    &commit.committer_name,
                    &commit.sha,
                    matched,
                ));
            }
            tracker.add_hit_to_repo(repo_full_name, has_profanity);
        }

        if !commits.is_empty() {
            add_standard_statistics(
                report,
                StatsLevel::Repository,
                &tracker,
                repo_full_name,
                PROFANITY,
                IN_COMMIT_MSG,
                ownership,
            );
        }
        Ok(tracker)
    }
}

impl Rule for ProfanityRule {
    fn name(&self) -> &'static str {
        "ProfanityRule"
    }

    fn rule_message(&self) -> String {
        "Profanity Checker".to_string()
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();

        for repo in self.context.targets.resolve(source)? {
            let src_tracker = self.check_files(&repo, &mut report)?;
            let commit_tracker = self.check_commit_messages(&repo, &mut report)?;

            for org_name in commit_tracker.orgs_with_hits() {
                add_standard_statistics(
                    &mut report,
                    StatsLevel::Organization,
                    &commit_tracker,
                    &org_name,
                    PROFANITY,
                    IN_COMMIT_MSG,
                    ownership,
                );
            }
            for org_name in src_tracker.orgs_with_hits() {
                add_standard_statistics(
                    &mut report,
                    StatsLevel::Organization,
                    &src_tracker,
                    &org_name,
                    PROFANITY,
                    IN_SOURCE,
                    ownership,
                );
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::ProfanityRule;
    use crate::domain::{Branch, Commit, RepoFile, Repository};
    use crate::error::PatrolError;
    use crate::ownership::MockRepoOwnership;
    use crate::recordable::ViolationDetail;
    use crate::rule::Rule;
    use crate::rules::RuleContext;
    use crate::source::{FixtureSource, RepoFixture};
    use crate::targets::TargetRepositories;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn context_with(source: FixtureSource) -> RuleContext {
        let mut ownership = MockRepoOwnership::new();
        ownership.expect_repository_owner().returning(|_| None);
        RuleContext::new(
            Arc::new(source),
            TargetRepositories::new(vec!["OMDev".to_string()], Vec::new()),
            Arc::new(ownership),
        )
    }

    #[test]
    fn empty_term_list_is_a_construction_error() {
        let context = context_with(FixtureSource::new());
        match ProfanityRule::new(context, 30, Vec::new()) {
            Err(PatrolError::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn flags_files_and_commit_messages() {
        let repo = Repository::new("OMDev/omapi", "master");
        let now = Utc::now();

        let mut source = FixtureSource::new();
        source.insert(RepoFixture {
            repository: repo.clone(),
            commits: vec![Commit {
                sha: "tip".to_string(),
                committer_name: "skhatri".to_string(),
                committer_email: "skhatri@example.com".to_string(),
                date: now - Duration::days(1),
                message: "this crud commit is darn bad".to_string(),
                parent_shas: Vec::new(),
            }],
            branches: vec![Branch {
                name: "master".to_string(),
                sha: "tip".to_string(),
            }],
            files: vec![RepoFile {
                name: "src/main.rs".to_string(),
                content: "// what the crud\n".to_string(),
            }],
            ..Default::default()
        });

        let rule = ProfanityRule::new(
            context_with(source),
            30,
            vec!["crud".to_string(), "darn".to_string()],
        )
        .expect("rule");
        let report = rule.execute().expect("execute");

        let violations: Vec<_> = report.violations().collect();
        assert_eq!(violations.len(), 2);
        match &violations[0].detail {
            ViolationDetail::FileWithProfanity { path, terms } => {
                assert_eq!(path, "src/main.rs");
                assert_eq!(terms, &vec!["crud".to_string()]);
            }
            other => panic!("expected FileWithProfanity, got {other:?}"),
        }
        match &violations[1].detail {
            ViolationDetail::CommitWithProfanity { terms, .. } => {
                assert_eq!(terms, &vec!["crud".to_string(), "darn".to_string()]);
            }
            other => panic!("expected CommitWithProfanity, got {other:?}"),
        }

        // Per-term file hits: crud found, darn not -> 1 of 2 positive.
        let src_percent = report
            .statistics()
            .find(|stat| stat.key == "percentOfProfanityWithProfaneLanguageInSource")
            .expect("source stat");
        assert_eq!(src_percent.value, "50");
    }
}
