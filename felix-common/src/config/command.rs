use super::ConfigError;

use std::{collections::HashSet, path::PathBuf};

use serde::Deserialize;

/// [command]
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigCommand {
    prefix: String,

    /// メッセージを処理しない送信者の識別子。
    #[serde(default = "Default::default")]
    pub ignore: HashSet<String>,

    /// コマンドを永続化する JSON ファイル。
    #[serde(default = "default_store")]
    pub store: PathBuf,
}

impl ConfigCommand {
    pub fn prefix(&self) -> Result<char, ConfigError> {
        let mut chars = self.prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConfigError::Invalid(format!(
                "command prefix must be a single character: {:?}",
                self.prefix
            ))),
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        self.prefix()?;
        Ok(())
    }
}

fn default_store() -> PathBuf {
    PathBuf::from("./commands.json")
}
