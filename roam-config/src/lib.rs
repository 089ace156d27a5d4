//! Shared configuration loader for the roampub toolchain.
//!
//! `defaults/roampub.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`PublishConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use roam_babel::tokenize::{CommonMarkOptions, TokenizeOptions};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/roampub.default.toml");

/// Top-level configuration consumed by roampub applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    pub tokenize: TokenizeConfig,
    pub convert: ConvertConfig,
    pub log: LogConfig,
}

/// Mirrors the knobs exposed by the tokenizer.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenizeConfig {
    pub normalize: bool,
    pub breaks: bool,
    pub html: bool,
}

impl TokenizeConfig {
    /// The settings as format parameters, for `serialize_with_options`.
    pub fn to_params(&self) -> HashMap<String, String> {
        HashMap::from([
            ("normalize".to_string(), self.normalize.to_string()),
            ("breaks".to_string(), self.breaks.to_string()),
            ("html".to_string(), self.html.to_string()),
        ])
    }
}

impl From<&TokenizeConfig> for CommonMarkOptions {
    fn from(config: &TokenizeConfig) -> Self {
        CommonMarkOptions {
            breaks: config.breaks,
            html: config.html,
        }
    }
}

impl From<&TokenizeConfig> for TokenizeOptions {
    fn from(config: &TokenizeConfig) -> Self {
        TokenizeOptions {
            normalize: config.normalize,
            commonmark: config.into(),
        }
    }
}

impl From<TokenizeConfig> for TokenizeOptions {
    fn from(config: TokenizeConfig) -> Self {
        (&config).into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub validate: bool,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `warn` or `roam_babel=debug`.
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PublishConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PublishConfig, ConfigError> {
    Loader::new().build()
}
