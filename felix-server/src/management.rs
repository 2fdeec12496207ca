use crate::{
    format::{Formatter, Notice, Subject},
    registry::{CommandRegistry, Edit},
};

use felix_common::persistence::PersistenceError;
use felix_core::{
    MAX_RESPONSES,
    error::ServerError,
    interface::reply::Replier,
    model::{command::PhysicalCommand, message::Platform},
};
use tracing::{error, info};

const ILLEGAL_NAME: &str = "Illegal command name. Command names must start with an alphanumeric character.";
const NO_PERMISSION: &str = "You don't have permission to modify commands.";
const INVALID_USAGE: &str = "Invalid usage.";
const INVALID_INDEX: &str = "Invalid index.";
const ONE_INDEXED: &str = "Value indexes are 1-indexed.";
const UNEXPECTED_ERROR: &str = "An unexpected error occurred while executing the command.";

/// 登録簿を操作する管理コマンド。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagementCommand {
    /// `cmdinfo`
    Info,

    /// `addcmd`, `setcmd`
    Set,

    /// `delcmd`, `unsetcmd`
    Delete,

    /// `addalias`
    Alias,
}

impl ManagementCommand {
    pub fn parse(name: &str) -> Option<ManagementCommand> {
        match name {
            "cmdinfo" => Some(ManagementCommand::Info),
            "addcmd" | "setcmd" => Some(ManagementCommand::Set),
            "delcmd" | "unsetcmd" => Some(ManagementCommand::Delete),
            "addalias" => Some(ManagementCommand::Alias),
            _ => None,
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            ManagementCommand::Info => "cmdinfo <name>",
            ManagementCommand::Set => "addcmd [-v] <name> [value]",
            ManagementCommand::Delete => "delcmd [-i <index>] <name>",
            ManagementCommand::Alias => "addalias <command name> <alias names...>",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ManagementArguments {
    add_value: bool,
    index: Option<i64>,
    positional: Vec<String>,
}

impl ManagementArguments {
    /// 先頭のフラグ (`-v`, `-i <index>`) と残りの引数に分ける。不明なフラグは `None`。
    fn parse(command: ManagementCommand, args: &[String]) -> Option<ManagementArguments> {
        let mut parsed = ManagementArguments::default();
        let mut rest = args.iter();
        while let Some(arg) = rest.next() {
            if !parsed.positional.is_empty() {
                parsed.positional.push(arg.clone());
                continue;
            }
            match (command, arg.as_str()) {
                (ManagementCommand::Set, "-v") => parsed.add_value = true,
                (ManagementCommand::Delete, "-i") => parsed.index = Some(rest.next()?.parse().ok()?),
                (_, flag) if is_flag(flag) => return None,
                _ => parsed.positional.push(arg.clone()),
            }
        }
        Some(parsed)
    }
}

fn is_flag(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-') && chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.next().is_none()
}

/// 新しい名前は英数字で始まらなければならない。
fn is_legal_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric())
}

fn reserved_name(name: &str) -> String {
    format!("Sorry, but '{name}' is a reserved command name.")
}

pub struct Management<'a> {
    registry: &'a CommandRegistry,
    formatter: Formatter,
}

impl<'a> Management<'a> {
    pub fn new(registry: &'a CommandRegistry, platform: Platform) -> Management<'a> {
        Management {
            registry,
            formatter: Formatter::for_platform(registry.prefix(), platform),
        }
    }

    /// 管理コマンドを実行し、結果を要求者に個別に返す。
    pub async fn execute(
        &self,
        command: ManagementCommand,
        args: &[String],
        replier: &dyn Replier,
    ) -> Result<(), ServerError> {
        let parsed = match self.parse_arguments(command, args) {
            Ok(parsed) => parsed,
            Err(rejection) => {
                replier.notify_requester(&[rejection]).await?;
                return Ok(());
            }
        };
        if !replier.can_manage_commands().await {
            info!("user was not permitted to run {command:?}");
            replier.notify_requester(&[NO_PERMISSION.to_string()]).await?;
            return Ok(());
        }

        let lines = match self.process(command, parsed).await {
            Ok(lines) => lines,
            Err(err) => {
                error!("failed to persist commands for {command:?}: {err}");
                replier.notify_requester(&[UNEXPECTED_ERROR.to_string()]).await?;
                return Err(ServerError::by_persistence(err));
            }
        };

        replier.notify_requester(&lines).await?;
        Ok(())
    }

    fn parse_arguments(&self, command: ManagementCommand, args: &[String]) -> Result<ManagementArguments, String> {
        let Some(parsed) = ManagementArguments::parse(command, args) else {
            return Err(INVALID_USAGE.to_string());
        };
        if command == ManagementCommand::Delete && parsed.positional.len() > 1 {
            return Err(INVALID_USAGE.to_string());
        }
        if parsed.positional.is_empty() {
            return Err(self.formatter.usage(command.usage()));
        }
        Ok(parsed)
    }

    async fn process(
        &self,
        command: ManagementCommand,
        args: ManagementArguments,
    ) -> Result<Vec<String>, PersistenceError> {
        let name = args.positional[0].to_lowercase();
        let value = args.positional[1..].join(" ");

        if !is_legal_name(&name) {
            return Ok(vec![ILLEGAL_NAME.to_string()]);
        }
        if self.registry.is_reserved(&name).await {
            return Ok(vec![reserved_name(&name)]);
        }

        match command {
            ManagementCommand::Info => Ok(self.info(&name).await),
            ManagementCommand::Alias if value.is_empty() => Ok(vec![self.formatter.usage(command.usage())]),
            ManagementCommand::Alias => self.add_aliases(&name, &value).await,
            ManagementCommand::Set if !value.is_empty() => self.set(&name, value, args.add_value).await,
            // 値のない addcmd/setcmd も削除として扱う
            ManagementCommand::Set | ManagementCommand::Delete => self.delete(&name, args.index).await,
        }
    }

    async fn info(&self, name: &str) -> Vec<String> {
        let Some(command) = self.registry.get(name).await else {
            return vec![self.formatter.render(Subject::Command, &Notice::NotFound { name })];
        };

        let mut lines: Vec<_> = command
            .responses
            .iter()
            .enumerate()
            .map(|(i, v)| self.formatter.info_value(name, i + 1, v))
            .collect();
        let aliases: Vec<_> = command.aliases.iter().filter(|a| *a != name).cloned().collect();
        if !aliases.is_empty() {
            lines.push(self.formatter.info_aliases(name, &aliases));
        }
        if lines.is_empty() {
            lines.push(self.formatter.info_empty(name));
        }
        lines
    }

    async fn set(&self, name: &str, value: String, add_value: bool) -> Result<Vec<String>, PersistenceError> {
        let formatter = self.formatter;
        self.registry
            .edit(|table| {
                let mut command = table.get_or_create(name);
                command.add_alias(name);

                if add_value && !command.is_parent() {
                    if command.is_full() {
                        return Edit::Discard(vec![format!(
                            "I'm sorry, but that command has reached the value limit ({MAX_RESPONSES})."
                        )]);
                    }
                    let line = formatter.render(Subject::Command, &Notice::ValueAdded { name, value: &value });
                    command.responses.push(value);
                    table.put(command);
                    return Edit::Commit(vec![line]);
                }

                let old_values = std::mem::replace(&mut command.responses, vec![value]);
                let notice = if old_values.is_empty() {
                    Notice::Added {
                        name,
                        values: &command.responses,
                    }
                } else {
                    Notice::Replaced {
                        name,
                        values: &command.responses,
                        old_values: &old_values,
                    }
                };
                let line = formatter.render(Subject::Command, &notice);
                table.put(command);
                Edit::Commit(vec![line])
            })
            .await
    }

    async fn delete(&self, name: &str, index: Option<i64>) -> Result<Vec<String>, PersistenceError> {
        let formatter = self.formatter;
        self.registry
            .edit(|table| {
                let Some(command) = table.get(name).cloned() else {
                    return Edit::Discard(vec![formatter.render(Subject::Command, &Notice::NotFound { name })]);
                };
                if index == Some(0) {
                    return Edit::Discard(vec![ONE_INDEXED.to_string()]);
                }

                // 1 を引いた位置が正のときだけ値を個別に削除する。-i 1 はコマンドごと削除になる。
                match index.map(|i| i.saturating_sub(1)) {
                    Some(offset) if offset > 0 => {
                        let Some(offset) = usize::try_from(offset).ok().filter(|o| *o < command.responses.len()) else {
                            return Edit::Discard(vec![INVALID_INDEX.to_string()]);
                        };

                        let mut edited = PhysicalCommand::clone(&command);
                        let removed = edited.responses.remove(offset);
                        table.put(edited);
                        Edit::Commit(vec![formatter.render(
                            Subject::Command,
                            &Notice::ValueRemoved { name, value: &removed },
                        )])
                    }
                    _ => {
                        table.remove(&command);
                        let aliases: Vec<_> = command.aliases.iter().filter(|a| *a != name).cloned().collect();
                        Edit::Commit(vec![formatter.render(
                            Subject::Command,
                            &Notice::Removed {
                                name,
                                old_values: &command.responses,
                                aliases: &aliases,
                            },
                        )])
                    }
                }
            })
            .await
    }

    async fn add_aliases(&self, name: &str, value: &str) -> Result<Vec<String>, PersistenceError> {
        let formatter = self.formatter;
        let reserved = self.registry.reserved_names().await;
        self.registry
            .edit(|table| {
                let Some(parent) = table.get(name) else {
                    return Edit::Discard(vec![formatter.render(Subject::Alias, &Notice::NoParent { name })]);
                };
                let mut parent = PhysicalCommand::clone(parent);

                let mut added = vec![];
                let mut replaced = vec![];
                for alias in value.split_whitespace().map(str::to_lowercase) {
                    if !is_legal_name(&alias) {
                        return Edit::Discard(vec![ILLEGAL_NAME.to_string()]);
                    }
                    if reserved.contains(&alias) {
                        return Edit::Discard(vec![reserved_name(&alias)]);
                    }

                    // 他のコマンドを指していた名前は、そのコマンドごと付け替える
                    let stolen = if parent.aliases.contains(&alias) {
                        None
                    } else {
                        table.get(&alias).cloned()
                    };
                    match stolen {
                        Some(existing) if !existing.is_parent() => {
                            table.remove(&existing);
                            replaced.push((alias.clone(), existing.responses.clone()));
                        }
                        Some(existing) => {
                            table.remove(&existing);
                            added.push(alias.clone());
                        }
                        None => added.push(alias.clone()),
                    }
                    parent.add_alias(&alias);
                }
                table.put(parent);

                let mut lines = vec![];
                if !added.is_empty() {
                    lines.push(formatter.render(Subject::Alias, &Notice::Added { name, values: &added }));
                }
                let parent_name = [name.to_string()];
                for (alias, old_values) in &replaced {
                    lines.push(formatter.render(
                        Subject::Alias,
                        &Notice::Replaced {
                            name: alias,
                            values: &parent_name,
                            old_values,
                        },
                    ));
                }
                Edit::Commit(lines)
            })
            .await
    }
}
