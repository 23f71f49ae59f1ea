//! Strategies for proving that a commit was code reviewed.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Commit;
use crate::error::Result;
use crate::fetcher::PullRequestFetcher;

// Anchored and deliberately not DOTALL: the phrase has to sit on the one
// and only line of the message, so multi-line bodies never qualify.
static REVIEWED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.*reviewed by.*$").expect("reviewed-by pattern"));

static TICKET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+-[0-9]+").expect("ticket token pattern"));

/// One independent predicate for proving a commit was reviewed.
///
/// Strategies are side-effect-free and individually testable; a commit
/// counts as reviewed as soon as any strategy in the chain approves it.
pub trait ReviewStrategy: Send + Sync {
    /// A short identifier for the strategy.
    fn name(&self) -> &'static str;
    /// Whether this strategy can prove the commit was reviewed.
    fn approves(&self, commit: &Commit, pull_requests: &mut PullRequestFetcher<'_>)
    -> Result<bool>;
}

/// Approves commits whose message carries a "reviewed by" phrase.
#[derive(Debug, Default)]
pub struct ReviewedByMessage;

impl ReviewStrategy for ReviewedByMessage {
    fn name(&self) -> &'static str {
        "reviewed-by-message"
    }

    fn approves(&self, commit: &Commit, _: &mut PullRequestFetcher<'_>) -> Result<bool> {
        Ok(REVIEWED_BY.is_match(&commit.message))
    }
}

/// Approves commits whose SHA appears on any recently closed pull request.
#[derive(Debug, Default)]
pub struct MatchingPullRequestSha;

impl ReviewStrategy for MatchingPullRequestSha {
    fn name(&self) -> &'static str {
        "matching-pull-request-sha"
    }

    fn approves(
        &self,
        commit: &Commit,
        pull_requests: &mut PullRequestFetcher<'_>,
    ) -> Result<bool> {
        Ok(pull_requests
            .recently_closed()?
            .iter()
            .any(|pr| pr.commit_shas.iter().any(|sha| sha == &commit.sha)))
    }
}

/// Approves commits whose ticket token (e.g. `OPP-2165`) shows up in the
/// title of any recently closed pull request, case-insensitively.
#[derive(Debug, Default)]
pub struct MatchingTicketInTitle;

impl ReviewStrategy for MatchingTicketInTitle {
    fn name(&self) -> &'static str {
        "matching-ticket-in-title"
    }

    fn approves(
        &self,
        commit: &Commit,
        pull_requests: &mut PullRequestFetcher<'_>,
    ) -> Result<bool> {
        let Some(ticket) = TICKET_TOKEN.find(&commit.message) else {
            return Ok(false);
        };
        let ticket = ticket.as_str().to_lowercase();
        Ok(pull_requests
            .recently_closed()?
            .iter()
            .any(|pr| pr.title.to_lowercase().contains(&ticket)))
    }
}

/// The default strategy chain, in evaluation order. Cheapest first; order
/// only affects short-circuiting since every strategy is monotonic.
pub fn default_review_strategies() -> Vec<Box<dyn ReviewStrategy>> {
    vec![
        Box::new(ReviewedByMessage),
        Box::new(MatchingPullRequestSha),
        Box::new(MatchingTicketInTitle),
    ]
}

/// Runs the chain until the first strategy that approves the commit.
pub fn chain_approves(
    strategies: &[Box<dyn ReviewStrategy>],
    commit: &Commit,
    pull_requests: &mut PullRequestFetcher<'_>,
) -> Result<bool> {
    for strategy in strategies {
        if strategy.approves(commit, pull_requests)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{
        MatchingPullRequestSha, MatchingTicketInTitle, ReviewStrategy, ReviewedByMessage,
        chain_approves, default_review_strategies,
    };
    use crate::domain::{Commit, PullRequest, PullRequestState, Repository};
    use crate::error::Result;
    use crate::fetcher::PullRequestFetcher;
    use crate::source::{FixtureSource, RepoFixture};
    use chrono::{TimeZone, Utc};

    fn commit(message: &str) -> Commit {
        Commit {
            sha: "abc123".to_string(),
            committer_name: "skhatri".to_string(),
            committer_email: "skhatri@example.com".to_string(),
            date: Utc.with_ymd_and_hms(2015, 6, 19, 0, 0, 0).unwrap(),
            message: message.to_string(),
            parent_shas: Vec::new(),
        }
    }

    fn source_with_prs(prs: Vec<PullRequest>) -> (FixtureSource, Repository) {
        let repo = Repository::new("OMDev/omapi", "master");
        let mut source = FixtureSource::new();
        source.insert(RepoFixture {
            repository: repo.clone(),
            pull_requests: prs,
            ..Default::default()
        });
        (source, repo)
    }

    fn recently_closed_pr(title: &str, commit_shas: &[&str]) -> PullRequest {
        PullRequest {
            number: 7,
            title: title.to_string(),
            state: PullRequestState::Closed,
            closed_at: Some(Utc.with_ymd_and_hms(2015, 6, 19, 0, 0, 0).unwrap()),
            head_sha: "head".to_string(),
            commit_shas: commit_shas.iter().map(|sha| sha.to_string()).collect(),
            last_committer: None,
        }
    }

    fn fetcher<'a>(source: &'a FixtureSource, repo: &'a Repository) -> PullRequestFetcher<'a> {
        PullRequestFetcher::with_now(
            source,
            repo,
            7,
            Utc.with_ymd_and_hms(2015, 6, 20, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn reviewed_by_message_matches_case_insensitively() {
        let (source, repo) = source_with_prs(Vec::new());
        let mut prs = fetcher(&source, &repo);
        let strategy = ReviewedByMessage;

        assert!(strategy
            .approves(&commit("OPP-111: endpoints [Reviewed by: skarivelithara]"), &mut prs)
            .expect("approves"));
        assert!(strategy
            .approves(&commit("REVIEWED BY someone"), &mut prs)
            .expect("approves"));
        assert!(!strategy
            .approves(&commit("bumped version to 4.3.0-SNAPSHOT"), &mut prs)
            .expect("approves"));
    }

    #[test]
    fn reviewed_by_rejects_multi_line_messages() {
        let (source, repo) = source_with_prs(Vec::new());
        let mut prs = fetcher(&source, &repo);
        let strategy = ReviewedByMessage;

        assert!(!strategy
            .approves(&commit("Fix payment bug\n\nReviewed by Daniel"), &mut prs)
            .expect("approves"));
        assert!(!strategy
            .approves(&commit("multi\nline\nREVIEWED BY someone"), &mut prs)
            .expect("approves"));
    }

    #[test]
    fn matching_sha_checks_cached_pull_request_commits() {
        let (source, repo) =
            source_with_prs(vec![recently_closed_pr("anything", &["zzz", "abc123"])]);
        let mut prs = fetcher(&source, &repo);

        assert!(MatchingPullRequestSha
            .approves(&commit("no markers here"), &mut prs)
            .expect("approves"));

        let (source, repo) = source_with_prs(vec![recently_closed_pr("anything", &["zzz"])]);
        let mut prs = fetcher(&source, &repo);
        assert!(!MatchingPullRequestSha
            .approves(&commit("no markers here"), &mut prs)
            .expect("approves"));
    }

    #[test]
    fn matching_ticket_compares_against_pull_request_titles() {
        let (source, repo) =
            source_with_prs(vec![recently_closed_pr("opp-2165 validate refund form", &[])]);
        let mut prs = fetcher(&source, &repo);

        assert!(MatchingTicketInTitle
            .approves(&commit("OPP-2165 validate refund form"), &mut prs)
            .expect("approves"));
        assert!(!MatchingTicketInTitle
            .approves(&commit("no ticket token at all"), &mut prs)
            .expect("approves"));
        assert!(!MatchingTicketInTitle
            .approves(&commit("PAY-9999 unrelated work"), &mut prs)
            .expect("approves"));
    }

    struct CountingStrategy {
        verdict: bool,
        calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl ReviewStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn approves(&self, _: &Commit, _: &mut PullRequestFetcher<'_>) -> Result<bool> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(self.verdict)
        }
    }

    #[test]
    fn chain_short_circuits_on_first_approval() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (source, repo) = source_with_prs(Vec::new());
        let mut prs = fetcher(&source, &repo);

        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let strategies: Vec<Box<dyn ReviewStrategy>> = vec![
            Box::new(CountingStrategy {
                verdict: true,
                calls: Arc::clone(&first_calls),
            }),
            Box::new(CountingStrategy {
                verdict: true,
                calls: Arc::clone(&second_calls),
            }),
        ];

        assert!(chain_approves(&strategies, &commit("m"), &mut prs).expect("chain"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn chain_outcome_is_order_independent() {
        let (source, repo) =
            source_with_prs(vec![recently_closed_pr("opp-2165 refund form", &["abc123"])]);
        let commit = commit("OPP-2165 refund form work");

        let forward = default_review_strategies();
        let mut prs = fetcher(&source, &repo);
        let forward_verdict = chain_approves(&forward, &commit, &mut prs).expect("chain");

        let reversed: Vec<Box<dyn ReviewStrategy>> = vec![
            Box::new(MatchingTicketInTitle),
            Box::new(MatchingPullRequestSha),
            Box::new(ReviewedByMessage),
        ];
        let mut prs = fetcher(&source, &repo);
        let reversed_verdict = chain_approves(&reversed, &commit, &mut prs).expect("chain");

        assert_eq!(forward_verdict, reversed_verdict);
        assert!(forward_verdict);
    }

    #[test]
    fn chain_rejects_when_every_strategy_fails() {
        let (source, repo) = source_with_prs(Vec::new());
        let mut prs = fetcher(&source, &repo);
        let strategies = default_review_strategies();
        assert!(!chain_approves(&strategies, &commit("plain message"), &mut prs).expect("chain"));
    }
}
