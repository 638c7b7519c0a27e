use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;
use crate::services::{MenteeColumns, MentorColumns};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub ingest: IngestSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Upper bound on request bodies, the CSV uploads travel inline
    #[serde(default = "default_payload_limit")]
    pub payload_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            payload_limit_bytes: default_payload_limit(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_payload_limit() -> usize { 8 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_idle_secs")]
    pub idle_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_secs: default_idle_secs(),
        }
    }
}

fn default_max_sessions() -> u64 { 64 }
fn default_idle_secs() -> u64 { 3600 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_age_weight")]
    pub age: f64,
    #[serde(default = "default_gender_weight")]
    pub gender: f64,
    #[serde(default = "default_language_weight")]
    pub language: f64,
    #[serde(default = "default_city_weight")]
    pub city: f64,
    #[serde(default = "default_study_level_weight")]
    pub study_level: f64,
    #[serde(default = "default_nationality_weight")]
    pub nationality: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            age: default_age_weight(),
            gender: default_gender_weight(),
            language: default_language_weight(),
            city: default_city_weight(),
            study_level: default_study_level_weight(),
            nationality: default_nationality_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            age: config.age,
            gender: config.gender,
            language: config.language,
            city: config.city,
            study_level: config.study_level,
            nationality: config.nationality,
        }
    }
}

fn default_age_weight() -> f64 { 0.30 }
fn default_gender_weight() -> f64 { 0.20 }
fn default_language_weight() -> f64 { 0.50 }
fn default_city_weight() -> f64 { 0.15 }
fn default_study_level_weight() -> f64 { 0.15 }
fn default_nationality_weight() -> f64 { 1.00 }

/// Column layout of the two survey exports
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestSettings {
    #[serde(default)]
    pub mentor_columns: MentorColumns,
    #[serde(default)]
    pub mentee_columns: MenteeColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

const ENV_PREFIX: &str = "MENTOR_MATCH";

fn environment() -> Environment {
    // e.g., MENTOR_MATCH__SERVER__PORT -> server.port
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTOR_MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}
