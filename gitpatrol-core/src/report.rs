//! Report container assembled by one rule execution.

use serde::{Deserialize, Serialize};

use crate::recordable::{Recordable, Statistic, Violation};

/// The results of running a policy rule: violations and statistics, with a
/// combined sequence preserving the order they were produced in.
///
/// Built once per rule run and drained into the recorder by the lifecycle
/// wrapper; never reused across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportResult {
    entries: Vec<Recordable>,
}

impl ReportResult {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation.
    pub fn push_violation(&mut self, violation: Violation) {
        self.entries.push(Recordable::Violation(violation));
    }

    /// Append a statistic.
    pub fn push_statistic(&mut self, statistic: Statistic) {
        self.entries.push(Recordable::Statistic(statistic));
    }

    /// All entries, violations and statistics interleaved in insertion order.
    pub fn entries(&self) -> &[Recordable] {
        &self.entries
    }

    /// The violations, in insertion order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.entries.iter().filter_map(|entry| match entry {
            Recordable::Violation(violation) => Some(violation),
            Recordable::Statistic(_) => None,
        })
    }

    /// The statistics, in insertion order.
    pub fn statistics(&self) -> impl Iterator<Item = &Statistic> {
        self.entries.iter().filter_map(|entry| match entry {
            Recordable::Statistic(statistic) => Some(statistic),
            Recordable::Violation(_) => None,
        })
    }

    /// Whether the report holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ReportResult;
    use crate::recordable::{Recordable, Statistic, Violation};

    #[test]
    fn combined_sequence_preserves_interleaved_order() {
        let mut report = ReportResult::new();
        report.push_violation(Violation::generic("OMDev", "OMDev/omapi", "unknown"));
        report.push_statistic(Statistic::new("OMDev", "OMDev/omapi", "bcorbett", "k1", "1"));
        report.push_violation(Violation::generic("OMDev", "OMDev/oms", "unknown"));

        let kinds: Vec<&str> = report
            .entries()
            .iter()
            .map(|entry| match entry {
                Recordable::Violation(_) => "violation",
                Recordable::Statistic(_) => "statistic",
            })
            .collect();
        assert_eq!(kinds, vec!["violation", "statistic", "violation"]);
    }

    #[test]
    fn typed_views_filter_by_kind() {
        let mut report = ReportResult::new();
        report.push_statistic(Statistic::new("OMDev", "n/a", "n/a", "k", "v"));
        report.push_violation(Violation::generic("OMDev", "OMDev/omapi", "unknown"));

        assert_eq!(report.violations().count(), 1);
        assert_eq!(report.statistics().count(), 1);
        assert!(!report.is_empty());
    }
}
