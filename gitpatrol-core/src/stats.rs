//! Hit-count statistics tracked per repository and per organization.

use std::collections::HashMap;

use crate::domain::org_from_repo_name;

/// The granularity a statistic is tracked at.
///
/// The enum is closed, so statistics dispatch is exhaustive by construction;
/// there is no "unrecognized level" failure mode to guard against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatsLevel {
    /// Statistics for a single repository.
    Repository,
    /// Statistics rolled up across an organization.
    Organization,
}

#[derive(Debug, Default)]
struct HitCounts {
    total: u64,
    positive: u64,
}

/// Tracks total and positive hit counts as a rule iterates over
/// repositories. Each rule execution owns its own instance; trackers are
/// never shared across runs.
#[derive(Debug)]
pub struct StatsTracker {
    statistic_name: String,
    org_hits: HashMap<String, HitCounts>,
    repo_hits: HashMap<String, HitCounts>,
}

impl StatsTracker {
    /// Create a tracker for the named statistic.
    pub fn new(statistic_name: impl Into<String>) -> Self {
        Self {
            statistic_name: statistic_name.into(),
            org_hits: HashMap::new(),
            repo_hits: HashMap::new(),
        }
    }

    /// The name this tracker was created with.
    pub fn statistic_name(&self) -> &str {
        &self.statistic_name
    }

    /// Record a hit against an organization only.
    pub fn add_hit_to_org(&mut self, org_name: &str, is_positive: bool) {
        increment(&mut self.org_hits, org_name, is_positive);
    }

    /// Record a hit against a repository and, derived from its name prefix,
    /// against the owning organization. Org totals therefore always equal
    /// the sum of their repositories' totals plus any direct org hits.
    pub fn add_hit_to_repo(&mut self, repo_full_name: &str, is_positive: bool) {
        increment(&mut self.repo_hits, repo_full_name, is_positive);
        let org_name = org_from_repo_name(repo_full_name).to_string();
        self.add_hit_to_org(&org_name, is_positive);
    }

    /// Every organization that has received at least one direct or derived
    /// hit, in no guaranteed order.
    pub fn orgs_with_hits(&self) -> Vec<String> {
        self.org_hits.keys().cloned().collect()
    }

    /// Total hits recorded at the given level for the given name.
    pub fn total_hits(&self, level: StatsLevel, name: &str) -> u64 {
        self.counts(level, name).map_or(0, |counts| counts.total)
    }

    /// Positive hits recorded at the given level for the given name.
    pub fn positive_hits(&self, level: StatsLevel, name: &str) -> u64 {
        self.counts(level, name).map_or(0, |counts| counts.positive)
    }

    /// Percentage of positive hits at the given level, rounded half-up.
    ///
    /// Defined as 0 when no hits have been recorded.
    pub fn percentage_of_positive_hits(&self, level: StatsLevel, name: &str) -> u64 {
        percent_positive(self.positive_hits(level, name), self.total_hits(level, name))
    }

    fn counts(&self, level: StatsLevel, name: &str) -> Option<&HitCounts> {
        match level {
            StatsLevel::Repository => self.repo_hits.get(name),
            StatsLevel::Organization => self.org_hits.get(name),
        }
    }
}

fn increment(map: &mut HashMap<String, HitCounts>, key: &str, is_positive: bool) {
    let counts = map.entry(key.to_string()).or_default();
    counts.total += 1;
    if is_positive {
        counts.positive += 1;
    }
}

/// `round(100 * positive / total)` with half-up rounding, 0 when total is 0.
fn percent_positive(positive: u64, total: u64) -> u64 {
    if positive == 0 || total == 0 {
        return 0;
    }
    // Half-up integer rounding of 100 * positive / total.
    (200 * positive + total) / (2 * total)
}

#[cfg(test)]
mod tests {
    use super::{StatsLevel, StatsTracker};

    fn assert_org_stats(tracker: &StatsTracker, org: &str, positive: u64, total: u64, percent: u64) {
        assert_eq!(tracker.positive_hits(StatsLevel::Organization, org), positive);
        assert_eq!(tracker.total_hits(StatsLevel::Organization, org), total);
        assert_eq!(
            tracker.percentage_of_positive_hits(StatsLevel::Organization, org),
            percent
        );
    }

    fn assert_repo_stats(
        tracker: &StatsTracker,
        repo: &str,
        positive: u64,
        total: u64,
        percent: u64,
    ) {
        assert_eq!(tracker.positive_hits(StatsLevel::Repository, repo), positive);
        assert_eq!(tracker.total_hits(StatsLevel::Repository, repo), total);
        assert_eq!(
            tracker.percentage_of_positive_hits(StatsLevel::Repository, repo),
            percent
        );
    }

    fn assert_orgs_with_hits(tracker: &StatsTracker, expected: &[&str]) {
        let mut orgs = tracker.orgs_with_hits();
        orgs.sort();
        let mut expected: Vec<&str> = expected.to_vec();
        expected.sort();
        assert_eq!(orgs, expected);
    }

    #[test]
    fn empty_tracker_reports_zeroes() {
        let tracker = StatsTracker::new("empty");
        assert_eq!(tracker.statistic_name(), "empty");
        assert!(tracker.orgs_with_hits().is_empty());
        assert_org_stats(&tracker, "bogus", 0, 0, 0);
        assert_repo_stats(&tracker, "bogus", 0, 0, 0);
    }

    #[test]
    fn repo_hits_roll_up_to_the_owning_org() {
        let mut tracker = StatsTracker::new("repoHits");

        tracker.add_hit_to_repo("OMDev/omapi", true);
        assert_orgs_with_hits(&tracker, &["OMDev"]);
        assert_org_stats(&tracker, "OMDev", 1, 1, 100);
        assert_repo_stats(&tracker, "OMDev/omapi", 1, 1, 100);
        assert_repo_stats(&tracker, "OMDev/bogus", 0, 0, 0);

        tracker.add_hit_to_repo("OMDev/omapi", false);
        assert_org_stats(&tracker, "OMDev", 1, 2, 50);
        assert_repo_stats(&tracker, "OMDev/omapi", 1, 2, 50);

        tracker.add_hit_to_repo("OMDev/oms", true);
        assert_org_stats(&tracker, "OMDev", 2, 3, 67);
        assert_repo_stats(&tracker, "OMDev/omapi", 1, 2, 50);
        assert_repo_stats(&tracker, "OMDev/oms", 1, 1, 100);

        tracker.add_hit_to_repo("OMDev/oms", false);
        assert_org_stats(&tracker, "OMDev", 2, 4, 50);

        tracker.add_hit_to_repo("payment-services/epic", true);
        assert_orgs_with_hits(&tracker, &["OMDev", "payment-services"]);
        assert_org_stats(&tracker, "OMDev", 2, 4, 50);
        assert_org_stats(&tracker, "payment-services", 1, 1, 100);
    }

    #[test]
    fn direct_org_hits_do_not_touch_repo_counters() {
        let mut tracker = StatsTracker::new("orgHits");
        tracker.add_hit_to_repo("payment-services/epic", true);
        tracker.add_hit_to_org("payment-services", true);
        tracker.add_hit_to_org("admin-tools", false);

        assert_orgs_with_hits(&tracker, &["payment-services", "admin-tools"]);
        assert_org_stats(&tracker, "payment-services", 2, 2, 100);
        assert_org_stats(&tracker, "admin-tools", 0, 1, 0);
        assert_repo_stats(&tracker, "payment-services/epic", 1, 1, 100);
    }

    #[test]
    fn percentage_rounds_half_up() {
        let mut tracker = StatsTracker::new("rounding");
        tracker.add_hit_to_repo("o/r", true);
        tracker.add_hit_to_repo("o/r", false);
        assert_eq!(tracker.percentage_of_positive_hits(StatsLevel::Repository, "o/r"), 50);

        tracker.add_hit_to_repo("o/r", true);
        // 2 of 3
        assert_eq!(tracker.percentage_of_positive_hits(StatsLevel::Repository, "o/r"), 67);

        let mut third = StatsTracker::new("third");
        third.add_hit_to_repo("o/r", true);
        third.add_hit_to_repo("o/r", false);
        third.add_hit_to_repo("o/r", false);
        // 1 of 3
        assert_eq!(third.percentage_of_positive_hits(StatsLevel::Repository, "o/r"), 33);
    }
}
