//! Repository data provider abstractions.
//!
//! The rules never talk to a hosting service directly; they consume this
//! narrow contract. The concrete transport (REST client, local mirror, a
//! JSON fixture) is irrelevant to rule correctness.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{Branch, Commit, ContentMatch, PullRequest, PullRequestState, RepoFile, Repository};
use crate::error::{PatrolError, Result};

/// Abstraction over repository data retrieval for testability.
#[cfg_attr(test, mockall::automock)]
pub trait RepositorySource {
    /// List the repositories belonging to an organization, ordered by name.
    fn repositories_for_org(&self, org_name: &str) -> Result<Vec<Repository>>;
    /// Fetch a single commit by SHA.
    fn commit(&self, repo: &Repository, sha: &str) -> Result<Commit>;
    /// The most recent commit on the repository's default branch, if any.
    fn latest_commit(&self, repo: &Repository) -> Result<Option<Commit>>;
    /// All branches of the repository, keyed by name.
    fn branches(&self, repo: &Repository) -> Result<BTreeMap<String, Branch>>;
    /// Pull requests in the given state.
    fn pull_requests(&self, repo: &Repository, state: PullRequestState) -> Result<Vec<PullRequest>>;
    /// Files at the root of the repository tree.
    ///
    /// Fails with [`PatrolError::EmptyRepository`] when the repository has no
    /// content at all; callers treat that as "no README", not as an error.
    fn root_files(&self, repo: &Repository) -> Result<Vec<RepoFile>>;
    /// Files whose contents match the search term.
    fn search_content(&self, repo: &Repository, term: &str) -> Result<Vec<ContentMatch>>;
}

/// Fixture data for one repository, as loaded from a JSON snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFixture {
    /// The repository handle.
    pub repository: Repository,
    /// Every commit reachable in the fixture, in no particular order.
    #[serde(default)]
    pub commits: Vec<Commit>,
    /// Branch heads.
    #[serde(default)]
    pub branches: Vec<Branch>,
    /// Open and closed pull requests.
    #[serde(default)]
    pub pull_requests: Vec<PullRequest>,
    /// Files at the repository root.
    #[serde(default)]
    pub files: Vec<RepoFile>,
    /// Marks a repository with no content at all.
    #[serde(default)]
    pub empty: bool,
}

/// A whole fleet snapshot consumable by [`FixtureSource`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Per-repository fixture data.
    #[serde(default)]
    pub repositories: Vec<RepoFixture>,
}

/// An in-memory [`RepositorySource`] backed by fixture data.
///
/// Used by the CLI runner and throughout the test suite; stands in for a
/// remote hosting service with no behavioral difference visible to rules.
#[derive(Debug, Default)]
pub struct FixtureSource {
    repos: HashMap<String, RepoFixture>,
}

impl FixtureSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a parsed fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut source = Self::new();
        for repo in fixture.repositories {
            source.insert(repo);
        }
        source
    }

    /// Build a source from a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Add or replace one repository's fixture data.
    pub fn insert(&mut self, fixture: RepoFixture) {
        self.repos
            .insert(fixture.repository.full_name.clone(), fixture);
    }

    fn fixture(&self, repo: &Repository) -> Result<&RepoFixture> {
        self.repos.get(&repo.full_name).ok_or_else(|| {
            PatrolError::Provider(format!("unknown repository: {}", repo.full_name))
        })
    }
}

impl RepositorySource for FixtureSource {
    fn repositories_for_org(&self, org_name: &str) -> Result<Vec<Repository>> {
        let mut repos: Vec<Repository> = self
            .repos
            .values()
            .map(|fixture| fixture.repository.clone())
            .filter(|repo| repo.org_name() == org_name)
            .collect();
        repos.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(repos)
    }

    fn commit(&self, repo: &Repository, sha: &str) -> Result<Commit> {
        self.fixture(repo)?
            .commits
            .iter()
            .find(|commit| commit.sha == sha)
            .cloned()
            .ok_or_else(|| {
                PatrolError::Provider(format!("unknown commit {sha} in {}", repo.full_name))
            })
    }

    fn latest_commit(&self, repo: &Repository) -> Result<Option<Commit>> {
        let fixture = self.fixture(repo)?;
        // Prefer the default branch tip; fall back to the newest commit.
        let tip = fixture
            .branches
            .iter()
            .find(|branch| branch.name == repo.default_branch)
            .and_then(|branch| {
                fixture
                    .commits
                    .iter()
                    .find(|commit| commit.sha == branch.sha)
            });
        Ok(tip
            .or_else(|| fixture.commits.iter().max_by_key(|commit| commit.date))
            .cloned())
    }

    fn branches(&self, repo: &Repository) -> Result<BTreeMap<String, Branch>> {
        Ok(self
            .fixture(repo)?
            .branches
            .iter()
            .map(|branch| (branch.name.clone(), branch.clone()))
            .collect())
    }

    fn pull_requests(&self, repo: &Repository, state: PullRequestState) -> Result<Vec<PullRequest>> {
        Ok(self
            .fixture(repo)?
            .pull_requests
            .iter()
            .filter(|pr| pr.state == state)
            .cloned()
            .collect())
    }

    fn root_files(&self, repo: &Repository) -> Result<Vec<RepoFile>> {
        let fixture = self.fixture(repo)?;
        if fixture.empty {
            return Err(PatrolError::EmptyRepository(repo.full_name.clone()));
        }
        Ok(fixture.files.clone())
    }

    fn search_content(&self, repo: &Repository, term: &str) -> Result<Vec<ContentMatch>> {
        Ok(self
            .fixture(repo)?
            .files
            .iter()
            .filter(|file| file.content.contains(term))
            .map(|file| ContentMatch {
                path: file.name.clone(),
            })
            .collect())
    }
}
