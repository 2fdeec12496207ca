pub mod client;
pub mod command;

use std::{fs::read_to_string, io::Error as IoError, path::Path};

use serde::Deserialize;
use serde_json::Error as SerdeJsonError;
use thiserror::Error as ThisError;

/// config.json
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub command: command::ConfigCommand,

    #[serde(default = "Default::default")]
    pub irc: Option<client::ConfigClientIrc>,

    #[serde(default = "Default::default")]
    pub discord: Option<client::ConfigClientDiscord>,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let config_str = read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(config_str).map_err(ConfigError::Serialization)?;
    config.command.validate()?;
    Ok(config)
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(IoError),

    #[error("serialization error: {0}")]
    Serialization(SerdeJsonError),

    #[error("invalid config: {0}")]
    Invalid(String),
}
