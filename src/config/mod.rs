mod options;
mod settings;

pub use options::{ParserOptions, Utf8Policy};
pub use settings::{Settings, CONFIG_FILE, ENV_PREFIX};
