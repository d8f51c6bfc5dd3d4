#![forbid(unsafe_code)]

//! Container construction errors.
//!
//! Only caller contract violations are errors. Protocol violations (events
//! out of order, unknown ids at runtime) degrade to no-ops and are logged.

use std::fmt;

use crate::config::ConfigError;

/// Errors from building or refreshing a [`SortableList`](crate::SortableList).
#[derive(Debug)]
pub enum SortableError {
    /// Two items share an identifier.
    DuplicateId {
        /// The identifier, rendered with `Display`.
        id: String,
        first: usize,
        second: usize,
    },
    Config(ConfigError),
}

impl fmt::Display for SortableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { id, first, second } => {
                write!(f, "duplicate item id {id:?} at indices {first} and {second}")
            }
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for SortableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::DuplicateId { .. } => None,
        }
    }
}

impl From<ConfigError> for SortableError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
