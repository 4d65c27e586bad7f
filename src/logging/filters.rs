use tracing_subscriber::EnvFilter;

use super::{LoggingConfig, LoggingError};

/// `RUST_LOG` if set, the configured directive otherwise.
pub fn build_filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    parse_directive(config.filter_directive())
}

pub fn parse_directive(directive: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidDirective {
        directive: directive.to_string(),
        source,
    })
}
