//! Configuration for the encoder and the `reqlc` tool.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `REQLWIRE_*` environment variables using `__` between
//! nesting levels (`REQLWIRE_ENCODER__MAX_DEPTH=64`).

use crate::error::{Error, Result};
use crate::reql::Encoder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReqlConfig {
    pub encoder: EncoderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Maximum term nesting; unlimited when absent.
    pub max_depth: Option<usize>,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl EncoderConfig {
    pub fn encoder(&self) -> Encoder {
        match self.max_depth {
            Some(depth) => Encoder::new().with_max_depth(depth),
            None => Encoder::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (trace, debug, info, warn, error, or an EnvFilter
    /// expression).
    pub level: String,
    /// Emit JSON log lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl ReqlConfig {
    /// Load configuration from defaults, an optional file and the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("REQLWIRE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<ReqlConfig>())
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
