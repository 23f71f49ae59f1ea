#![deny(missing_docs)]
//! GitPatrol command-line interface.
//!
//! Evaluates the policy rule set against a repository snapshot and records
//! every violation and statistic through the logging recorder.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use gitpatrol_core::{
    CodeReviewRule, FixtureSource, JiraTagRule, JsonRecorder, LogRecorder, ProfanityRule,
    ReadMeOwnership, ReadMeRule, Recorder, RepositorySource, Rule, RuleContext, StaleBranchesRule,
    StalePullRequestsRule, StaleRepositoriesRule, TargetRepositories, run_rule,
};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "gitpatrol", version, about = "GitPatrol CLI")]
struct Cli {
    /// JSON snapshot of the repositories to evaluate.
    #[arg(long)]
    fixture: PathBuf,
    /// Organizations in scope (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',', required = true)]
    org: Vec<String>,
    /// Repository full names to leave out (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
    /// Staleness and review thresholds, in days.
    #[arg(long, default_value_t = 30)]
    days: i64,
    /// File with one profanity term (a regular expression) per line.
    #[arg(long)]
    terms_file: Option<PathBuf>,
    /// Rule names to run (repeatable or comma-separated; default all).
    #[arg(long, value_delimiter = ',')]
    rule: Vec<String>,
    /// Stream report entries to stdout as JSON lines instead of log lines.
    #[arg(long)]
    json: bool,
}

#[cfg(not(test))]
fn main() -> CliResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    let rules = build_configured_rules(&cli)?;
    let recorder: Box<dyn Recorder> = if cli.json {
        Box::new(JsonRecorder::new(std::io::stdout()))
    } else {
        Box::new(LogRecorder::new())
    };
    for rule in &rules {
        run_rule(rule.as_ref(), recorder.as_ref());
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

/// Wire the rule set from the command line: any configuration problem
/// (unreadable fixture, empty term list, unknown rule name) fails here,
/// before any rule runs.
fn build_configured_rules(cli: &Cli) -> CliResult<Vec<Box<dyn Rule>>> {
    let json = std::fs::read_to_string(&cli.fixture)?;
    let source: Arc<dyn RepositorySource + Send + Sync> =
        Arc::new(FixtureSource::from_json(&json)?);

    let mut targets = TargetRepositories::new(cli.org.clone(), Vec::new());
    for exclude in &cli.exclude {
        targets.exclude_repository(exclude);
    }

    let ownership = Arc::new(ReadMeOwnership::new(source.clone()));
    let context = RuleContext::new(source, targets, ownership);

    let terms = match &cli.terms_file {
        Some(path) => load_terms(path)?,
        None => Vec::new(),
    };

    let rules = build_rules(context, cli.days, terms)?;
    select_rules(rules, &cli.rule)
}

/// The full rule set; the profanity rule joins only when terms were given.
fn build_rules(
    context: RuleContext,
    days: i64,
    terms: Vec<String>,
) -> CliResult<Vec<Box<dyn Rule>>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(JiraTagRule::new(context.clone(), days)),
        Box::new(CodeReviewRule::new(context.clone(), days)),
        Box::new(StaleBranchesRule::new(context.clone(), days)),
        Box::new(StalePullRequestsRule::new(context.clone(), days)),
        Box::new(StaleRepositoriesRule::new(context.clone(), days)),
        Box::new(ReadMeRule::new(context.clone())),
    ];
    if !terms.is_empty() {
        rules.push(Box::new(ProfanityRule::new(context, days, terms)?));
    }
    Ok(rules)
}

fn select_rules(rules: Vec<Box<dyn Rule>>, names: &[String]) -> CliResult<Vec<Box<dyn Rule>>> {
    if names.is_empty() {
        return Ok(rules);
    }

    for name in names {
        if !rules
            .iter()
            .any(|rule| rule.name().eq_ignore_ascii_case(name))
        {
            return Err(format!("unknown rule: {name}").into());
        }
    }

    Ok(rules
        .into_iter()
        .filter(|rule| {
            names
                .iter()
                .any(|name| rule.name().eq_ignore_ascii_case(name))
        })
        .collect())
}

fn load_terms(path: &Path) -> CliResult<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    let terms = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(terms)
}
