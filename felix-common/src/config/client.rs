use serde::Deserialize;

/// [irc]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigClientIrc {
    pub nick: String,
    pub host: String,
    pub port: u16,

    #[serde(default = "Default::default")]
    pub ssl: bool,

    #[serde(default = "Default::default")]
    pub password: Option<String>,

    #[serde(default = "Default::default")]
    pub channels: Vec<String>,
}

/// [discord]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfigClientDiscord {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    pub token: String,

    /// 管理コマンドを実行できるユーザー ID。
    #[serde(default = "Default::default")]
    pub operators: Vec<String>,
}

fn default_enabled() -> bool {
    true
}
