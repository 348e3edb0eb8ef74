use serde::Deserialize;

use crate::middleware::DEFAULT_MAX_BODY_BYTES;
use crate::observability::{LogConfig, LogFormat};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub gate: GateSettings,
    pub application: ApplicationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateSettings {
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub log_level: String,
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl ApplicationSettings {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: LogFormat::from(self.log_format.as_str()),
            ..LogConfig::default()
        }
    }
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Loads built-in defaults, then `config/default`, `config/local` and
    /// `APP__SECTION__KEY` environment variables, later sources winning.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("gate.max_body_bytes", DEFAULT_MAX_BODY_BYTES as u64)?
            .set_default("application.log_level", "info")?
            .set_default("application.log_format", "pretty")?
            .set_default("application.metrics_enabled", true)
    }
}
