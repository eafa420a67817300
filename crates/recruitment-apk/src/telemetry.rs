use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("'{directive}' is not a usable log filter")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("global subscriber could not be installed")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Install the process-wide subscriber: compact single-line records without
/// ANSI escapes, readable in container logs and journald alike. `RUST_LOG`
/// overrides the configured level so verbosity can be raised on a running
/// deployment without touching its config.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}

fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::Filter {
        directive: directive.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_levels_and_directives_parse() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("recruitment_apk=debug,info").is_ok());
    }

    #[test]
    fn malformed_directives_are_rejected_with_the_input_named() {
        let err = parse_filter("definitely not a filter").expect_err("rejected");
        assert!(err.to_string().contains("definitely not a filter"));
    }
}
