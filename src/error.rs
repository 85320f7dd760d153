//! Error types for the content script.
//!
//! None of these are fatal to the host page: callers log them and skip the
//! enhancement that failed.

use umbra_detect::PageError;

/// A DOM read or write failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A DOM call was rejected.
    #[error("{op} failed: {detail}")]
    Operation { op: &'static str, detail: String },
    /// A required element does not exist (yet).
    #[error("missing <{0}> element")]
    MissingElement(&'static str),
    /// A read-only page query failed.
    #[error(transparent)]
    Page(#[from] PageError),
}

impl DomError {
    pub fn operation(op: &'static str, detail: impl Into<String>) -> Self {
        Self::Operation { op, detail: detail.into() }
    }
}

/// The preference collaborator could not answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
}

/// A command could not be delivered or understood.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// No content script is listening in the target context.
    #[error("no receiver: {0}")]
    NoReceiver(String),
    /// The envelope is not a known command.
    #[error("malformed command: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Configuration text was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Startup could not reach the point of offering the theme.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("document finished parsing without a body ({attempts} retries)")]
    BodyUnavailable { attempts: u32 },
}
