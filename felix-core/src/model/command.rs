use crate::MAX_RESPONSES;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// ユーザーが登録したコマンド本体。
/// 全てのエイリアスが同一の `PhysicalCommand` を指す。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalCommand {
    pub aliases: BTreeSet<String>,

    #[serde(default = "Default::default")]
    pub responses: Vec<String>,
}

impl PhysicalCommand {
    pub fn new(alias: &str, responses: impl IntoIterator<Item = impl Into<String>>) -> PhysicalCommand {
        let mut command = PhysicalCommand {
            aliases: BTreeSet::new(),
            responses: responses.into_iter().map(|r| r.into()).collect(),
        };
        command.add_alias(alias);
        command
    }

    /// エイリアスを小文字化して追加する。
    pub fn add_alias(&mut self, alias: &str) {
        self.aliases.insert(alias.to_lowercase());
    }

    /// 値を持たない親コマンド(エイリアスの付け先にのみ使える)かどうか。
    pub fn is_parent(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.responses.len() >= MAX_RESPONSES
    }

    pub fn first_alias(&self) -> Option<&str> {
        self.aliases.first().map(|a| a.as_str())
    }

    /// 永続化ファイルから読み込んだものを正規化する。
    pub fn normalized(self) -> PhysicalCommand {
        PhysicalCommand {
            aliases: self.aliases.iter().map(|a| a.to_lowercase()).collect(),
            responses: self.responses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_lowercased() {
        let mut command = PhysicalCommand::new("Hello", ["Hi there!"]);
        command.add_alias("HEY");

        assert_eq!(command.aliases.iter().collect::<Vec<_>>(), vec!["hello", "hey"]);
        assert_eq!(command.first_alias(), Some("hello"));
    }

    #[test]
    fn parent_and_full_states() {
        let mut command = PhysicalCommand::new("parent", Vec::<String>::new());
        assert!(command.is_parent());
        assert!(!command.is_full());

        command.responses = vec!["a".into(), "b".into(), "c".into()];
        assert!(!command.is_parent());
        assert!(command.is_full());
    }

    #[test]
    fn deserializes_record_without_responses() {
        let command: PhysicalCommand = serde_json::from_str(r#"{"aliases":["Foo","bar"]}"#).expect("valid json");
        let command = command.normalized();

        assert!(command.is_parent());
        assert!(command.aliases.contains("foo"));
        assert!(command.aliases.contains("bar"));
    }
}
