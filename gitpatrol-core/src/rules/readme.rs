//! Repositories must carry a meaningful README with an identifiable owner.

use log::warn;

use crate::domain::RepoFile;
use crate::error::{PatrolError, Result};
use crate::recordable::Violation;
use crate::report::ReportResult;
use crate::rule::{Rule, add_standard_statistics, owner_username};
use crate::rules::RuleContext;
use crate::stats::{StatsLevel, StatsTracker};

const README_FILE_NAME: &str = "README.md";
const REPOS: &str = "Repos";
const WITH_VALID_README: &str = "WithValidReadMe";

/// Flags repositories without a root README that names an owner.
pub struct ReadMeRule {
    context: RuleContext,
}

impl ReadMeRule {
    /// Create the rule.
    pub fn new(context: RuleContext) -> Self {
        Self { context }
    }

    /// A README is substantial when it spans more than one line.
    fn has_content(readme: &RepoFile) -> bool {
        readme.content.matches('\n').count() > 1
    }
}

impl Rule for ReadMeRule {
    fn name(&self) -> &'static str {
        "ReadMeRule"
    }

    fn rule_message(&self) -> String {
        "Repositories should have a README.md naming an owner.".to_string()
    }

    fn execute(&self) -> Result<ReportResult> {
        let mut report = ReportResult::new();
        let mut tracker = StatsTracker::new("reposWithReadMe");
        let source = self.context.source.as_ref();
        let ownership = self.context.ownership.as_ref();

        for repo in self.context.targets.resolve(source)? {
            let repo_full_name = repo.full_name.as_str();
            let root_files = match source.root_files(&repo) {
                Ok(files) => files,
                Err(PatrolError::EmptyRepository(_)) => {
                    warn!("{repo_full_name} has no content; treating as missing README");
                    Vec::new()
                }
                Err(err) => return Err(err),
            };

            let readme = root_files
                .iter()
                .find(|file| file.name.eq_ignore_ascii_case(README_FILE_NAME));
            let valid = readme.is_some_and(Self::has_content)
                && ownership.repository_owner(repo_full_name).is_some();

            if !valid {
                report.push_violation(Violation::generic(
                    repo.org_name(),
                    repo_full_name,
                    owner_username(ownership, repo_full_name),
                ));
            }

            tracker.add_hit_to_repo(repo_full_name, valid);
        }

        for org_name in tracker.orgs_with_hits() {
            add_standard_statistics(
                &mut report,
                StatsLevel::Organization,
                &tracker,
                &org_name,
                REPOS,
                WITH_VALID_README,
                ownership,
            );
        }

        Ok(report)
    }
}
