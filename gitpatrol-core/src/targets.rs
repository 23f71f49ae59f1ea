//! Scope filtering for the repositories the rules evaluate.

use crate::domain::Repository;
use crate::error::Result;
use crate::source::RepositorySource;

/// The externally-configured evaluation scope: organizations to audit and
/// individual repositories excluded from every rule.
#[derive(Debug, Clone, Default)]
pub struct TargetRepositories {
    orgs_in_scope: Vec<String>,
    repos_out_of_scope: Vec<String>,
}

impl TargetRepositories {
    /// Create a scope from org names and excluded repository full names.
    pub fn new(orgs_in_scope: Vec<String>, repos_out_of_scope: Vec<String>) -> Self {
        Self {
            orgs_in_scope,
            repos_out_of_scope,
        }
    }

    /// The organizations in scope.
    pub fn orgs_in_scope(&self) -> &[String] {
        &self.orgs_in_scope
    }

    /// The repository full names excluded from evaluation.
    pub fn repos_out_of_scope(&self) -> &[String] {
        &self.repos_out_of_scope
    }

    /// Exclude a repository from evaluation. A blank or already-excluded
    /// name is ignored.
    pub fn exclude_repository(&mut self, repo_full_name: &str) {
        let trimmed = repo_full_name.trim();
        if !trimmed.is_empty() && !self.repos_out_of_scope.iter().any(|name| name == trimmed) {
            self.repos_out_of_scope.push(trimmed.to_string());
        }
    }

    /// Remove a previous exclusion.
    pub fn cancel_exclusion(&mut self, repo_full_name: &str) {
        self.repos_out_of_scope.retain(|name| name != repo_full_name);
    }

    /// Resolve the scope to concrete repositories: every repository of every
    /// in-scope org, minus the excluded full names, in provider order.
    pub fn resolve(&self, source: &dyn RepositorySource) -> Result<Vec<Repository>> {
        let mut targeted = Vec::new();
        for org_name in &self.orgs_in_scope {
            for repo in source.repositories_for_org(org_name)? {
                if !self.repos_out_of_scope.contains(&repo.full_name) {
                    targeted.push(repo);
                }
            }
        }
        Ok(targeted)
    }
}

#[cfg(test)]
mod tests {
    use super::TargetRepositories;
    use crate::domain::Repository;
    use crate::source::{FixtureSource, RepoFixture};

    fn source_with(names: &[&str]) -> FixtureSource {
        let mut source = FixtureSource::new();
        for name in names {
            source.insert(RepoFixture {
                repository: Repository::new(*name, "master"),
                ..Default::default()
            });
        }
        source
    }

    #[test]
    fn resolve_expands_orgs_and_applies_exclusions() {
        let source = source_with(&["OMDev/omapi", "OMDev/oms", "payment-services/epic"]);
        let targets = TargetRepositories::new(
            vec!["OMDev".to_string()],
            vec!["OMDev/oms".to_string()],
        );

        let repos = targets.resolve(&source).expect("resolve");
        let names: Vec<&str> = repos.iter().map(|repo| repo.full_name.as_str()).collect();
        assert_eq!(names, vec!["OMDev/omapi"]);
    }

    #[test]
    fn exclusions_can_be_added_and_cancelled() {
        let mut targets = TargetRepositories::new(vec!["OMDev".to_string()], Vec::new());
        targets.exclude_repository("OMDev/omapi");
        targets.exclude_repository("  ");
        targets.exclude_repository("OMDev/omapi");
        assert_eq!(targets.repos_out_of_scope(), ["OMDev/omapi".to_string()]);

        targets.cancel_exclusion("OMDev/omapi");
        assert!(targets.repos_out_of_scope().is_empty());
    }
}
