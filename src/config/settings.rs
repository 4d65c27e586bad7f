use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::ParserOptions;
use crate::{dictionary::Dictionary, logging::LoggingConfig};
use cmf_error::CmfResult;

/// Name of the optional configuration file (any format `config` knows,
/// e.g. `cmf.toml`).
pub const CONFIG_FILE: &str = "cmf";

/// Prefix of the environment overrides, e.g. `CMF_PARSER__UTF8=lossy`.
pub const ENV_PREFIX: &str = "CMF";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub parser: ParserOptions,
    /// Dictionary as JSON: an array of names or an object of name -> number.
    pub dictionary: Option<String>,
}

impl Settings {
    /// Loads defaults, then `cmf.toml` (if present), then `CMF_*`
    /// environment variables. Nested keys use `__`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Same layering as [`load`](Self::load) with `toml` text in place of
    /// the configuration file.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Validated dictionary, `None` if none is configured.
    pub fn dictionary(&self) -> CmfResult<Option<Dictionary>> {
        self.dictionary
            .as_deref()
            .map(Dictionary::from_json)
            .transpose()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = LoggingConfig::default();
        Config::builder()
            .set_default("logging.level", defaults.level)?
            .set_default("logging.format", defaults.format.as_str())?
            .set_default("logging.with_target", defaults.with_target)?
            .set_default("logging.with_ansi", defaults.with_ansi)?
            .set_default("parser.utf8", "strict")
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }
}
