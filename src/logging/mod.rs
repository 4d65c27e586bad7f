//! Console logging for applications embedding the codec.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application, which can use [`init_logging`].

pub mod config;
mod filters;
mod formatter;
pub mod handle;

pub use config::{LogFormat, LoggingConfig};
pub use handle::LoggingHandle;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter directive '{directive}': {source}")]
    InvalidDirective {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Unknown log format '{0}'. Expected pretty, compact or json")]
    UnknownFormat(String),

    #[error("Failed to install the global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),

    #[error("Failed to reload the log filter: {0}")]
    Reload(String),
}

/// Installs the global subscriber: an `EnvFilter` (`RUST_LOG` first, then
/// `config.level`) and a console layer in `config.format`.
///
/// # Errors
/// Fails on an invalid directive or if a global subscriber already exists.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    let env_filter = filters::build_filter_from_config(&config)?;
    let (filter_layer, filter_handle) = reload::Layer::new(env_filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(formatter::build_formatter_from_config(&config))
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        format = %config.format,
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(filter_handle, config.format))
}
