use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::executor::scheduler::SchedulerConfig;
use crate::ingestion::types::BatchingConfig;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_http_addr")]
    pub http_addr: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,
    #[serde(default = "default_work_duration_ms")]
    pub work_duration_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_min_id")]
    pub min_id: u64,
    #[serde(default = "default_max_id")]
    pub max_id: u64,
}

fn default_http_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_batch_size() -> usize {
    3
}

fn default_rate_limit_ms() -> u64 {
    5_000
}

fn default_idle_poll_ms() -> u64 {
    100
}

fn default_work_duration_ms() -> u64 {
    1_000
}

fn default_max_attempts() -> u32 {
    1
}

fn default_min_id() -> u64 {
    1
}

fn default_max_id() -> u64 {
    1_000_000_007
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            batch_size: default_batch_size(),
            rate_limit_ms: default_rate_limit_ms(),
            idle_poll_ms: default_idle_poll_ms(),
            work_duration_ms: default_work_duration_ms(),
            max_attempts: default_max_attempts(),
            min_id: default_min_id(),
            max_id: default_max_id(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::Message("batch_size must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Message(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.idle_poll_ms == 0 {
            return Err(ConfigError::Message(
                "idle_poll_ms must be greater than 0".into(),
            ));
        }
        if self.min_id > self.max_id {
            return Err(ConfigError::Message(format!(
                "min_id ({}) must not exceed max_id ({})",
                self.min_id, self.max_id
            )));
        }
        Ok(())
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            rate_limit: Duration::from_millis(self.rate_limit_ms),
            idle_poll: Duration::from_millis(self.idle_poll_ms),
            max_attempts: self.max_attempts,
        }
    }

    pub fn batching(&self) -> BatchingConfig {
        BatchingConfig {
            batch_size: self.batch_size,
            min_id: self.min_id,
            max_id: self.max_id,
        }
    }

    pub fn work_duration(&self) -> Duration {
        Duration::from_millis(self.work_duration_ms)
    }
}

/// Loads `config.{toml,yaml,json}` if present, then environment overrides.
pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default().try_parsing(true))
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
