//! The policy rule contract and its execution lifecycle.

use crate::error::Result;
use crate::ownership::RepoOwnership;
use crate::recordable::Statistic;
use crate::recording::Recorder;
use crate::report::ReportResult;
use crate::stats::{StatsLevel, StatsTracker};

/// Date format used when reporting when something was last touched.
pub const LAST_TOUCH_DATE_FORMAT: &str = "%Y-%m-%d";

/// One policy check, executed against the full target repository set.
///
/// Implementations own their tracker and report for the duration of one
/// `execute` call and let retrieval errors bubble up; the lifecycle wrapper
/// absorbs them.
pub trait Rule {
    /// A stable name used to attribute recorded messages.
    fn name(&self) -> &'static str;
    /// A human-readable description of the policy being enforced.
    fn rule_message(&self) -> String;
    /// Evaluate the rule and produce its report.
    fn execute(&self) -> Result<ReportResult>;
}

/// Run one rule through the fixed lifecycle: record "starting" and the rule
/// description, execute, forward every report entry in order on success or
/// record the error detail on failure, then always record "complete".
///
/// A failing rule never aborts the process or any other rule; the error is
/// recorded here and goes no further. When `execute` fails, none of that
/// run's entries are forwarded (all-or-nothing).
pub fn run_rule(rule: &dyn Rule, recorder: &dyn Recorder) {
    let name = rule.name();
    recorder.record_state(name, "starting");
    recorder.record_message(name, &format!("message={}", rule.rule_message()));

    match rule.execute() {
        Ok(report) => {
            for entry in report.entries() {
                recorder.record_entry(name, entry);
            }
        }
        Err(err) => recorder.record_error(name, &err.to_string()),
    }

    recorder.record_state(name, "complete");
}

/// Look up the owner username for a repository, degrading to `"unknown"`
/// when ownership cannot be resolved. Never fails the enclosing rule.
pub fn owner_username(ownership: &dyn RepoOwnership, repo_full_name: &str) -> String {
    ownership
        .repository_owner(repo_full_name)
        .map(|owner| owner.username)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Add the standard three statistics every rule records for a target:
/// the number of objects evaluated, the number that evaluated positively,
/// and the percentage that evaluated positively.
///
/// `target` is an org name at [`StatsLevel::Organization`] and a repository
/// full name at [`StatsLevel::Repository`]; the statistic keys get an `Org`
/// suffix at org level, where the repo and owner fields are `n/a`.
pub fn add_standard_statistics(
    report: &mut ReportResult,
    level: StatsLevel,
    tracker: &StatsTracker,
    target: &str,
    object_being_counted: &str,
    positive_statement: &str,
    ownership: &dyn RepoOwnership,
) {
    let (org_name, repo_full_name, repo_owner, suffix) = match level {
        StatsLevel::Organization => (target.to_string(), "n/a".to_string(), "n/a".to_string(), "Org"),
        StatsLevel::Repository => (
            crate::domain::org_from_repo_name(target).to_string(),
            target.to_string(),
            owner_username(ownership, target),
            "",
        ),
    };

    report.push_statistic(Statistic::new(
        &org_name,
        &repo_full_name,
        &repo_owner,
        format!("numberOf{object_being_counted}{suffix}"),
        tracker.total_hits(level, target).to_string(),
    ));
    report.push_statistic(Statistic::new(
        &org_name,
        &repo_full_name,
        &repo_owner,
        format!("numberOf{object_being_counted}{positive_statement}{suffix}"),
        tracker.positive_hits(level, target).to_string(),
    ));
    report.push_statistic(Statistic::new(
        &org_name,
        &repo_full_name,
        &repo_owner,
        format!("percentOf{object_being_counted}{positive_statement}{suffix}"),
        tracker.percentage_of_positive_hits(level, target).to_string(),
    ));
}
