#![forbid(unsafe_code)]

//! Optional JSON log subscriber.
//!
//! Library code only emits `tracing` spans and events. Hosts that already
//! install a subscriber need nothing from this module; others can call
//! [`init_json`] once at startup.
//!
//! The filter uses `EnvFilter` directive syntax, e.g.
//! `"dndsort_sortable=debug"`. `RUST_LOG` overrides it when set.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Default directives when neither `RUST_LOG` nor an explicit filter is set.
pub const DEFAULT_FILTER: &str = "dndsort_sortable=info,dndsort_core=info";

/// Build the filter: `RUST_LOG` if set, else `directives`.
pub fn env_filter(directives: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(directives).map_err(|err| Error::Logging(err.to_string())),
    }
}

/// Install a global JSON subscriber writing to stderr.
///
/// Fails if the directives do not parse or a global subscriber is already
/// installed.
pub fn init_json(directives: &str) -> Result<()> {
    let filter = env_filter(directives)?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| Error::Logging(err.to_string()))?;
    tracing::debug!(directives, "json logging installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_directives_are_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = env_filter("dndsort_sortable=verbose").expect_err("invalid directive");
        assert!(matches!(err, Error::Logging(_)));
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
