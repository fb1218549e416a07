use config::{Config, Environment, File};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::domain::GenerationPolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub imposter: ImposterSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerationSettings {
    #[serde(default)]
    pub policy: GenerationPolicy,
    #[serde(default)]
    pub options: GenerationOptions,
}

/// Tunables for the format generator and instantiator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationOptions {
    /// Length of random words for plain strings
    #[serde(default = "default_string_length")]
    pub random_string_length: usize,
    /// Number of elements generated for every array
    #[serde(default = "default_array_length")]
    pub random_array_length: usize,
    #[serde(default = "default_min_number")]
    pub min_number: i64,
    #[serde(default = "default_max_number")]
    pub max_number: i64,
    #[serde(default)]
    pub static_values: StaticValues,
    /// Values for formats without a built-in generator. These are returned
    /// under every policy, since unknown formats cannot be randomized.
    #[serde(default)]
    pub custom_formats: IndexMap<String, Value>,
}

fn default_string_length() -> usize {
    10
}

fn default_array_length() -> usize {
    3
}

fn default_min_number() -> i64 {
    1
}

fn default_max_number() -> i64 {
    1000
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            random_string_length: default_string_length(),
            random_array_length: default_array_length(),
            min_number: default_min_number(),
            max_number: default_max_number(),
            static_values: StaticValues::default(),
            custom_formats: IndexMap::new(),
        }
    }
}

impl GenerationOptions {
    pub fn with_custom_format(mut self, name: impl Into<String>, value: Value) -> Self {
        self.custom_formats.insert(name.into(), value);
        self
    }

    pub fn custom_format(&self, name: &str) -> Option<&Value> {
        self.custom_formats.get(name).filter(|value| !value.is_null())
    }
}

/// Values used under the static policy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticValues {
    pub string_default: String,
    pub number_default: i64,
    pub boolean_default: bool,
    pub uuid: String,
    pub email: String,
    pub date_time: String,
    pub date: String,
    pub password: String,
    pub byte: String,
    pub binary: String,
    pub uri: String,
    pub ipv4: String,
    pub hostname: String,
}

impl Default for StaticValues {
    fn default() -> Self {
        Self {
            string_default: "ran string".to_string(),
            number_default: 42,
            boolean_default: true,
            uuid: "766b0150-3ee2-11e6-beb8-9e71128cae77".to_string(),
            email: "mock.user@example.com".to_string(),
            date_time: "2016-07-01T12:00:00+00:00".to_string(),
            date: "2016-07-01".to_string(),
            password: "password_abcde".to_string(),
            byte: "YWJjZGU=".to_string(),
            binary: "01100001".to_string(),
            uri: "http://example.com/mock".to_string(),
            ipv4: "127.0.0.1".to_string(),
            hostname: "example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImposterSettings {
    #[serde(default = "default_imposter_port")]
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_imposter_port() -> u16 {
    3000
}

fn default_protocol() -> String {
    "http".to_string()
}

impl Default for ImposterSettings {
    fn default() -> Self {
        Self {
            port: default_imposter_port(),
            protocol: default_protocol(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus `MOCKBANK_*` environment
    /// variables (`MOCKBANK_GENERATION__POLICY=static`).
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("MOCKBANK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        settings.validated()
    }

    /// Create settings from CLI arguments (config file, env, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(cli.config.as_path()).required(false))
            .add_source(
                Environment::with_prefix("MOCKBANK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validated()
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(policy) = cli.policy {
            self.generation.policy = policy;
        }
        if let Some(port) = cli.port {
            self.imposter.port = port;
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }
}
