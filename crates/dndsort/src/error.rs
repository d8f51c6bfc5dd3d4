#![forbid(unsafe_code)]

//! Unified error type for dndsort hosts.
//!
//! Runtime drag protocol problems never surface here; they degrade to
//! no-op transitions and are logged. This type only covers contract
//! violations at the edges: building a container, loading configuration,
//! and installing a log subscriber.

use std::fmt;

use dndsort_sortable::{ConfigError, ReorderError, SortableError};

/// Top-level error for dndsort APIs.
#[derive(Debug)]
pub enum Error {
    /// Container construction or refresh failed.
    Sortable(SortableError),
    /// Configuration failed to load or validate.
    Config(ConfigError),
    /// An explicit `try_array_move` was out of range.
    Reorder(ReorderError),
    /// A global log subscriber could not be installed.
    Logging(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sortable(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Reorder(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sortable(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Reorder(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<SortableError> for Error {
    fn from(err: SortableError) -> Self {
        match err {
            SortableError::Config(config) => Self::Config(config),
            other => Self::Sortable(other),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ReorderError> for Error {
    fn from(err: ReorderError) -> Self {
        Self::Reorder(err)
    }
}

/// Standard result type for dndsort APIs.
pub type Result<T> = std::result::Result<T, Error>;
