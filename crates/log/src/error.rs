//! Error handling for warden-log

use thiserror::Error;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while building or installing the subscriber
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LogError {
    /// The level filter string could not be parsed
    #[error("invalid filter '{filter}': {reason}")]
    Filter {
        /// The rejected filter directive
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("global subscriber already set: {0}")]
    AlreadyInitialized(String),

    /// Unknown output format name
    #[error("unknown log format '{0}', expected pretty, compact or json")]
    UnknownFormat(String),
}

impl LogError {
    /// Create a filter parsing error
    pub fn filter(filter: impl Into<String>, reason: impl ToString) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.to_string(),
        }
    }
}
