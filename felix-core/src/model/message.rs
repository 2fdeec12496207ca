use std::fmt::{Display, Formatter, Result as FmtResult};

/// メッセージを受け取ったプラットフォーム。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Irc,
    Discord,
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Platform::Irc => f.write_str("IRC"),
            Platform::Discord => f.write_str("Discord"),
        }
    }
}

/// プラットフォームのクライアントから `FelixServer` に渡されるメッセージ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub platform: Platform,

    /// 無視リストと照合される送信者の識別子(IRC ならニックネーム、Discord ならユーザー ID)。
    pub sender_id: String,

    /// 宛先を省略したときに使われる送信者の表示名。
    pub sender_name: String,

    pub text: String,
}

impl IncomingMessage {
    pub fn new(
        platform: Platform,
        sender_id: impl Into<String>,
        sender_name: impl Into<String>,
        text: impl Into<String>,
    ) -> IncomingMessage {
        IncomingMessage {
            platform,
            sender_id: sender_id.into(),
            sender_name: sender_name.into(),
            text: text.into(),
        }
    }
}
