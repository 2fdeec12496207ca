//! 管理コマンドの確認・エラーメッセージと、コマンドの値の返信文を組み立てる。
//!
//! テンプレートに引用符は含めず、差し込むときに必要なら付ける。

use felix_common::text::{english_list, prefixed, wrap_prefix};
use felix_core::model::message::Platform;

/// 操作の対象がコマンドかエイリアスか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Command,
    Alias,
}

/// 登録簿に対する操作の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice<'a> {
    /// 新規に設定された。エイリアスの場合 `values` は追加されたエイリアス名。
    Added { name: &'a str, values: &'a [String] },

    /// 既存の値が置き換えられた。エイリアスの場合 `name` はエイリアス、`values` は付け先のコマンド名。
    Replaced {
        name: &'a str,
        values: &'a [String],
        old_values: &'a [String],
    },

    /// コマンドが削除された。`aliases` は同時に消えた他のエイリアス。
    Removed {
        name: &'a str,
        old_values: &'a [String],
        aliases: &'a [String],
    },

    ValueAdded { name: &'a str, value: &'a str },
    ValueRemoved { name: &'a str, value: &'a str },
    NotFound { name: &'a str },
    NoParent { name: &'a str },
}

// \x0f は IRC の書式リセット
const IRC_QUOTE_OPEN: &str = "'\x0f";
const IRC_QUOTE_CLOSE: &str = "\x0f'";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    prefix: char,
    quote_open: &'static str,
    quote_close: &'static str,
}

impl Formatter {
    pub fn new(prefix: char) -> Formatter {
        Formatter {
            prefix,
            quote_open: "'",
            quote_close: "'",
        }
    }

    /// IRC では引用した値の書式がメッセージの残りに漏れないよう、引用符の内側で書式をリセットする。
    pub fn for_platform(prefix: char, platform: Platform) -> Formatter {
        match platform {
            Platform::Irc => Formatter {
                prefix,
                quote_open: IRC_QUOTE_OPEN,
                quote_close: IRC_QUOTE_CLOSE,
            },
            Platform::Discord => Formatter::new(prefix),
        }
    }

    /// コマンドの値をチャットに返すときの形式。
    pub fn value(&self, name: &str, value: &str) -> String {
        wrap_prefix(self.prefix, name, value)
    }

    pub fn usage(&self, usage: &str) -> String {
        format!("Usage: {}", prefixed(self.prefix, usage))
    }

    /// `cmdinfo` の値 1 件分。`index` は 1 始まり。
    pub fn info_value(&self, name: &str, index: usize, value: &str) -> String {
        format!("Command {} has value #{index} {}.", self.command(name), self.quote(value))
    }

    pub fn info_aliases(&self, name: &str, aliases: &[String]) -> String {
        format!("Command {} has aliases {}.", self.command(name), self.commands(aliases))
    }

    pub fn info_empty(&self, name: &str) -> String {
        format!("Command {} has no values.", self.command(name))
    }

    pub fn render(&self, subject: Subject, notice: &Notice<'_>) -> String {
        match (subject, notice) {
            (Subject::Alias, Notice::Added { name, values }) if values.len() > 1 => {
                format!("Aliases {} have been set to {}.", self.commands(values), self.command(name))
            }
            (Subject::Alias, Notice::Added { name, values }) => {
                format!("Alias {} has been set to {}.", self.commands(values), self.command(name))
            }
            (
                Subject::Alias,
                Notice::Replaced {
                    name,
                    values,
                    old_values,
                },
            ) => format!(
                "Alias {} has been set to {}. Old value: {}.",
                self.command(name),
                self.commands(values),
                self.quoted_list(*old_values)
            ),
            (Subject::Alias, Notice::NotFound { .. }) => "Could not find an alias by that name.".to_string(),

            (_, Notice::Added { name, values }) => {
                format!("Command {} has been set to {}.", self.command(name), self.quoted_list(*values))
            }
            (
                _,
                Notice::Replaced {
                    name,
                    values,
                    old_values,
                },
            ) => format!(
                "Command {} has been set to {}. Old value: {}.",
                self.command(name),
                self.quoted_list(*values),
                self.quoted_list(*old_values)
            ),
            (
                _,
                Notice::Removed {
                    name,
                    old_values,
                    aliases,
                },
            ) => {
                let removed = format!(
                    "Command {} removed. Old value: {}.",
                    self.command(name),
                    self.quoted_list(*old_values)
                );
                match aliases.len() {
                    0 => removed,
                    1 => format!("{removed} (Alias {} was also removed.)", self.commands(aliases)),
                    _ => format!("{removed} (Aliases {} were also removed.)", self.commands(aliases)),
                }
            }
            (_, Notice::ValueAdded { name, value }) => {
                format!("Value {} added to command {}.", self.quote(value), self.command(name))
            }
            (_, Notice::ValueRemoved { name, value }) => {
                format!("Value {} removed from command {}.", self.quote(value), self.command(name))
            }
            (_, Notice::NotFound { .. }) => "Could not find a command by that name.".to_string(),
            (_, Notice::NoParent { name }) => format!("Could not find the parent command {}.", self.command(name)),
        }
    }

    fn quote(&self, text: &str) -> String {
        format!("{}{text}{}", self.quote_open, self.quote_close)
    }

    fn quoted_list<T: AsRef<str>>(&self, items: impl IntoIterator<Item = T>) -> String {
        english_list(items, self.quote_open, self.quote_close)
    }

    fn command(&self, name: &str) -> String {
        self.quote(&prefixed(self.prefix, name))
    }

    fn commands(&self, names: &[String]) -> String {
        self.quoted_list(names.iter().map(|n| prefixed(self.prefix, n)))
    }
}
