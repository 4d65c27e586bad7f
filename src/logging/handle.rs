use tracing_subscriber::{reload, EnvFilter, Registry};

use super::{filters::parse_directive, LogFormat, LoggingError};

/// Handle returned by [`init_logging`](super::init_logging).
///
/// Lets the level change at runtime without reinstalling the subscriber.
pub struct LoggingHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    format: LogFormat,
}

impl LoggingHandle {
    pub(crate) fn new(
        filter: reload::Handle<EnvFilter, Registry>,
        format: LogFormat,
    ) -> Self {
        Self { filter, format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    /// Current filter directive.
    pub fn directive(&self) -> Result<String, LoggingError> {
        self.filter
            .with_current(|f| f.to_string())
            .map_err(|e| LoggingError::Reload(e.to_string()))
    }

    /// Replaces the filter, e.g. `set_level("cmf=trace")`.
    pub fn set_level(
        &self,
        directive: &str,
    ) -> Result<(), LoggingError> {
        let filter = parse_directive(directive)?;
        self.filter
            .reload(filter)
            .map_err(|e| LoggingError::Reload(e.to_string()))?;
        tracing::info!(directive, "Log level changed");
        Ok(())
    }
}

impl std::fmt::Debug for LoggingHandle {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LoggingHandle")
            .field("format", &self.format)
            .field("directive", &self.directive().ok())
            .finish()
    }
}
