//! Error types for GitPatrol core.

use std::{error::Error, fmt, io};

/// Error type for GitPatrol core operations.
#[derive(Debug)]
pub enum PatrolError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A fixture or payload that could not be deserialized.
    Parse(serde_json::Error),
    /// A transient failure reported by the repository data provider.
    Provider(String),
    /// The repository has no content at all (no tree to list).
    ///
    /// Consumers treat this as "no README / empty repo", not as a failure.
    EmptyRepository(String),
    /// A rule was constructed with invalid configuration.
    ///
    /// Raised before any scheduling happens; never produced mid-run.
    Config(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for PatrolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::Provider(message) => write!(f, "provider error: {message}"),
            Self::EmptyRepository(repo) => write!(f, "repository has no content: {repo}"),
            Self::Config(message) => write!(f, "configuration error: {message}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for PatrolError {}

impl From<io::Error> for PatrolError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PatrolError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Convenience result type for GitPatrol core.
pub type Result<T> = std::result::Result<T, PatrolError>;
