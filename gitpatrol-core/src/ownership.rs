//! Repository ownership resolution.
//!
//! Ownership lives in a `#Ownership#` section of the repository README:
//!
//! ```text
//! #Ownership#
//! Owner: bcorbett (bcorbett@example.com)<br/>
//! Code Reviewers: bcorbett (bcorbett@example.com), skhatri (skhatri@example.com)<br/>
//! ```
//!
//! Lookups are cached with an expire-after-write TTL so rules can ask for
//! the same repository's owner repeatedly without refetching the README.
//! Ownership failures never fail an enclosing rule; they degrade to "no
//! owner known".

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::cache::TtlCache;
use crate::domain::{GitUser, Repository};
use crate::error::PatrolError;
use crate::source::RepositorySource;

const README_FILENAME: &str = "README.MD";
const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// A reviewer entry meaning "anyone may review".
pub const ANY_REVIEWER: &str = "any";

/// Resolves who owns a repository and who is allowed to review its code.
#[cfg_attr(test, mockall::automock)]
pub trait RepoOwnership {
    /// The repository owner, or `None` when ownership cannot be determined.
    fn repository_owner(&self, repo_full_name: &str) -> Option<GitUser>;
    /// The approved reviewers, or an empty list when none are known.
    fn repository_reviewers(&self, repo_full_name: &str) -> Vec<GitUser>;
}

#[derive(Debug, Clone, Default)]
struct OwnershipInfo {
    owner: Option<GitUser>,
    reviewers: Vec<GitUser>,
}

/// [`RepoOwnership`] backed by README parsing with a TTL cache.
pub struct ReadMeOwnership {
    source: Arc<dyn RepositorySource + Send + Sync>,
    cache: Mutex<TtlCache<String, OwnershipInfo>>,
}

impl ReadMeOwnership {
    /// Create a resolver with the standard 12-hour cache lifetime.
    pub fn new(source: Arc<dyn RepositorySource + Send + Sync>) -> Self {
        Self::with_ttl(source, CACHE_TTL)
    }

    /// Create a resolver with an explicit cache entry lifetime.
    pub fn with_ttl(source: Arc<dyn RepositorySource + Send + Sync>, ttl: Duration) -> Self {
        Self {
            source,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    fn ownership_info(&self, repo_full_name: &str) -> OwnershipInfo {
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.get_or_insert_with(&repo_full_name.to_string(), || {
            self.load_ownership_info(repo_full_name)
        })
    }

    fn load_ownership_info(&self, repo_full_name: &str) -> OwnershipInfo {
        let repo = Repository::new(repo_full_name, "master");
        match self.source.root_files(&repo) {
            Ok(files) => files
                .iter()
                .find(|file| file.name.eq_ignore_ascii_case(README_FILENAME))
                .map(|readme| parse_ownership_info(repo_full_name, &readme.content))
                .unwrap_or_default(),
            Err(PatrolError::EmptyRepository(_)) => {
                log::warn!("cannot retrieve contents of empty repository {repo_full_name}");
                OwnershipInfo::default()
            }
            Err(err) => {
                log::error!("error reading README ownership for {repo_full_name}: {err}");
                OwnershipInfo::default()
            }
        }
    }
}

impl RepoOwnership for ReadMeOwnership {
    fn repository_owner(&self, repo_full_name: &str) -> Option<GitUser> {
        self.ownership_info(repo_full_name).owner
    }

    fn repository_reviewers(&self, repo_full_name: &str) -> Vec<GitUser> {
        self.ownership_info(repo_full_name).reviewers
    }
}

fn parse_ownership_info(repo_full_name: &str, readme: &str) -> OwnershipInfo {
    let lines: Vec<&str> = readme.lines().collect();
    for (index, line) in lines.iter().enumerate() {
        if !line.to_lowercase().contains("#ownership#") {
            continue;
        }
        // The section header must be followed by an owner line and a
        // reviewers line.
        if index + 2 >= lines.len() {
            break;
        }

        let owner_line = after_colon(lines[index + 1]);
        let owner = parse_git_user(repo_full_name, owner_line, false);

        let reviewers_line = after_colon(lines[index + 2]);
        let reviewers = reviewers_line
            .split(',')
            .filter_map(|entry| parse_git_user(repo_full_name, entry, true))
            .collect();

        return OwnershipInfo { owner, reviewers };
    }
    OwnershipInfo::default()
}

fn after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest).unwrap_or("")
}

/// Parse `"username (email)"` into a [`GitUser`]. When `allow_any` is set,
/// the literal `any` is accepted as a wildcard reviewer.
fn parse_git_user(repo_full_name: &str, entry: &str, allow_any: bool) -> Option<GitUser> {
    let entry = entry.replace("<br/>", "");
    let entry = entry.trim();

    if allow_any && entry.eq_ignore_ascii_case(ANY_REVIEWER) {
        return Some(GitUser::new(ANY_REVIEWER, ANY_REVIEWER));
    }

    let mut parts = entry.split_whitespace();
    let (Some(username), Some(email_part)) = (parts.next(), parts.next()) else {
        log::error!("malformed ownership entry in README.md of {repo_full_name}: {entry:?}");
        return None;
    };
    let email = email_part
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(email, _)| email)
        .unwrap_or("");
    Some(GitUser::new(username, email))
}
