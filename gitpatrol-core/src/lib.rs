#![deny(missing_docs)]
//! GitPatrol core library.
//!
//! This crate contains the domain types, policy rules, and evaluation
//! primitives that power the broader GitPatrol platform.

pub mod cache;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod ownership;
pub mod recordable;
pub mod recording;
pub mod report;
pub mod review;
/// The rule contract and its shared execution helpers.
pub mod rule;
pub mod rules;
pub mod source;
pub mod stats;
pub mod targets;
pub mod walker;

pub use domain::{Branch, Commit, GitUser, PullRequest, PullRequestState, Repository};
pub use error::{PatrolError, Result};
pub use fetcher::PullRequestFetcher;
pub use ownership::{ReadMeOwnership, RepoOwnership};
pub use recordable::{Recordable, Statistic, Violation, ViolationDetail};
pub use recording::{JsonRecorder, LogRecorder, Recorder};
pub use report::ReportResult;
pub use review::{ReviewStrategy, default_review_strategies};
pub use rule::{Rule, run_rule};
pub use rules::{
    CodeReviewRule, JiraTagRule, ProfanityRule, ReadMeRule, RuleContext, StaleBranchesRule,
    StalePullRequestsRule, StaleRepositoriesRule,
};
pub use source::{Fixture, FixtureSource, RepoFixture, RepositorySource};
pub use stats::{StatsLevel, StatsTracker};
pub use targets::TargetRepositories;
pub use walker::CommitHistoryWalker;
