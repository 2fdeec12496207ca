use crate::{
    format::Formatter,
    management::{Management, ManagementCommand},
    registry::CommandRegistry,
};

use std::collections::HashMap;

use felix_common::text::tokenize;
use felix_core::{
    MAX_TARGETS,
    error::ServerError,
    interface::{custom_command::ArcCustomCommand, reply::Replier},
    model::{command::PhysicalCommand, message::IncomingMessage, target::Target},
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const UNEXPECTED_ERROR: &str = "An unexpected error occurred while executing the command.";

pub struct FelixInner {
    registry: CommandRegistry,
    formatter: Formatter,
    custom_commands: RwLock<HashMap<String, ArcCustomCommand>>,
}

impl FelixInner {
    pub fn new(registry: CommandRegistry) -> FelixInner {
        FelixInner {
            formatter: Formatter::new(registry.prefix()),
            registry,
            custom_commands: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_custom_command(&self, name: &str, command: ArcCustomCommand) {
        let name = name.to_lowercase();
        self.registry.reserve(&name).await;

        let mut locked = self.custom_commands.write().await;
        locked.insert(name.clone(), command);
        info!("custom command registered: {name}");
    }

    pub async fn process_message(&self, message: &IncomingMessage, replier: &dyn Replier) -> Result<(), ServerError> {
        if self.registry.is_ignored(&message.sender_id) {
            return Ok(());
        }
        if message.text.chars().count() < 2 {
            return Ok(());
        }
        let Some(command_line) = message.text.strip_prefix(self.registry.prefix()) else {
            return Ok(());
        };

        let tokens = tokenize(command_line);
        let Some(first_token) = tokens.first() else {
            return Ok(());
        };
        let first_token = first_token.to_lowercase();

        if let Some(management) = ManagementCommand::parse(&first_token) {
            Management::new(&self.registry, message.platform)
                .execute(management, &tokens[1..], replier)
                .await?;
            info!(
                "processed command '{command_line}' from {} user '{}'",
                message.platform, message.sender_name
            );
            return Ok(());
        }

        let (target, name) = Target::split(&first_token);
        if let Some(command) = self.registry.get(name).await {
            let victims = match tokens.len() {
                1 => message.sender_name.clone(),
                _ => tokens[1..].join(" "),
            };
            return self.send_values(target, name, &command, &victims, message, replier).await;
        }

        self.call_custom_command(name, &tokens, message, replier).await
    }

    /// コマンドの値を宛先の種類に応じて送る。
    async fn send_values(
        &self,
        target: Target,
        name: &str,
        command: &PhysicalCommand,
        victims: &str,
        message: &IncomingMessage,
        replier: &dyn Replier,
    ) -> Result<(), ServerError> {
        let values: Vec<_> = command
            .responses
            .iter()
            .map(|v| self.formatter.value(name, v))
            .collect();
        if values.is_empty() {
            return Ok(());
        }

        match target {
            Target::Default => replier.send_channel(&values).await?,
            Target::SelfPrivate => replier.notify_requester(&values).await?,
            Target::UserPublic => {
                let Some(victims) = split_victims(victims) else {
                    debug!("too many targets for '{name}' from '{}'", message.sender_name);
                    return Ok(());
                };
                let lines: Vec<_> = victims
                    .iter()
                    .flat_map(|victim| values.iter().map(move |v| format!("{victim}: {v}")))
                    .collect();
                replier.send_channel(&lines).await?;
            }
            Target::UserPrivate => {
                let Some(victims) = split_victims(victims) else {
                    debug!("too many targets for '{name}' from '{}'", message.sender_name);
                    return Ok(());
                };
                for victim in victims {
                    if !replier.send_private(victim, &values).await? {
                        debug!("target '{victim}' is not present");
                    }
                }
            }
        }
        Ok(())
    }

    async fn call_custom_command(
        &self,
        name: &str,
        tokens: &[String],
        message: &IncomingMessage,
        replier: &dyn Replier,
    ) -> Result<(), ServerError> {
        let command = {
            let locked = self.custom_commands.read().await;
            let Some(command) = locked.get(name) else {
                return Ok(());
            };
            command.clone()
        };

        match command.process(tokens, message, replier).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!(
                    "custom command '{name}' failed for '{}' from {} user '{}': {err}",
                    message.text, message.platform, message.sender_name
                );
                if let Err(notify_err) = replier.notify_requester(&[UNEXPECTED_ERROR.to_string()]).await {
                    warn!("failed to notify the requester: {notify_err}");
                }
                Err(ServerError::CustomCommand {
                    name: name.to_string(),
                    source: err,
                })
            }
        }
    }
}

/// `,` 区切りの宛先を分ける。空の区切りも数に含め、宛先が多すぎるときは `None`。
fn split_victims(victims: &str) -> Option<Vec<&str>> {
    let pieces: Vec<_> = victims.split(',').collect();
    if pieces.len() >= MAX_TARGETS {
        return None;
    }
    Some(pieces.into_iter().map(str::trim).filter(|v| !v.is_empty()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{RecordingReplier, Sent};

    use std::sync::Arc;

    use felix_common::persistence::JsonCommandStore;
    use felix_core::{
        error::CommandError,
        interface::custom_command::CustomCommand,
        model::message::Platform,
    };
    use futures::{FutureExt, future::BoxFuture};
    use tempfile::{TempDir, tempdir};

    struct FailingCommand;

    impl CustomCommand for FailingCommand {
        fn process<'a>(
            &'a self,
            _tokens: &'a [String],
            _message: &'a IncomingMessage,
            _replier: &'a dyn Replier,
        ) -> BoxFuture<'a, Result<(), CommandError>> {
            async { Err(CommandError::InvalidArguments("always".into())) }.boxed()
        }
    }

    struct EchoCommand;

    impl CustomCommand for EchoCommand {
        fn process<'a>(
            &'a self,
            tokens: &'a [String],
            _message: &'a IncomingMessage,
            replier: &'a dyn Replier,
        ) -> BoxFuture<'a, Result<(), CommandError>> {
            async move {
                replier.send_channel(&[tokens.join("|")]).await?;
                Ok(())
            }
            .boxed()
        }
    }

    fn felix_in(dir: &TempDir) -> FelixInner {
        let store = JsonCommandStore::new(dir.path().join("commands.json"));
        let registry = CommandRegistry::load(store, '!', ["bot".to_string()]).expect("loadable");
        FelixInner::new(registry)
    }

    fn said(sender: &str, text: &str) -> IncomingMessage {
        IncomingMessage::new(Platform::Discord, sender, sender, text)
    }

    async fn send(felix: &FelixInner, replier: &RecordingReplier, text: &str) -> Vec<Sent> {
        felix
            .process_message(&said("alice", text), replier)
            .await
            .expect("processed");
        replier.take()
    }

    fn channel(lines: &[&str]) -> Vec<Sent> {
        lines.iter().map(|l| Sent::Channel(l.to_string())).collect()
    }

    #[tokio::test]
    async fn adds_then_replies_with_command() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();

        let sent = send(&felix, &replier, "!addcmd hello Hi there!").await;
        assert_eq!(
            sent,
            vec![Sent::Requester("Command '!hello' has been set to 'Hi there!'.".into())]
        );

        let sent = send(&felix, &replier, "!hello").await;
        assert_eq!(sent, channel(&["!hello: Hi there!"]));

        let sent = send(&felix, &replier, "!HELLO").await;
        assert_eq!(sent, channel(&["!hello: Hi there!"]));
    }

    #[tokio::test]
    async fn aliases_reply_like_their_command() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();

        send(&felix, &replier, "!addcmd hello Hi there!").await;
        let sent = send(&felix, &replier, "!addalias hello hey").await;
        assert_eq!(
            sent,
            vec![Sent::Requester("Alias '!hey' has been set to '!hello'.".into())]
        );

        assert_eq!(send(&felix, &replier, "!hey").await, channel(&["!hey: Hi there!"]));
    }

    #[tokio::test]
    async fn sends_every_value_in_order() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();

        send(&felix, &replier, "!addcmd hello one").await;
        send(&felix, &replier, "!addcmd -v hello two").await;

        assert_eq!(
            send(&felix, &replier, "!hello").await,
            channel(&["!hello: one", "!hello: two"])
        );
    }

    #[tokio::test]
    async fn routes_by_target() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        send(&felix, &replier, "!addcmd hello Hi").await;

        assert_eq!(send(&felix, &replier, "!>hello").await, channel(&["alice: !hello: Hi"]));
        assert_eq!(
            send(&felix, &replier, "!>hello bob, carol").await,
            channel(&["bob: !hello: Hi", "carol: !hello: Hi"])
        );
        assert_eq!(
            send(&felix, &replier, "!>>hello bob").await,
            vec![Sent::Private("bob".into(), "!hello: Hi".into())]
        );
        assert_eq!(
            send(&felix, &replier, "!<hello").await,
            vec![Sent::Requester("!hello: Hi".into())]
        );
    }

    #[tokio::test]
    async fn drops_sends_with_too_many_targets() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        send(&felix, &replier, "!addcmd hello Hi").await;

        assert_eq!(send(&felix, &replier, "!>hello alice,bob,carol").await, vec![]);
        assert_eq!(send(&felix, &replier, "!>>hello alice,bob,carol").await, vec![]);
        assert_eq!(
            send(&felix, &replier, "!>>hello alice,bob").await,
            vec![
                Sent::Private("alice".into(), "!hello: Hi".into()),
                Sent::Private("bob".into(), "!hello: Hi".into()),
            ]
        );
    }

    #[tokio::test]
    async fn skips_absent_private_targets() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        send(&felix, &replier, "!addcmd hello Hi").await;

        assert_eq!(
            send(&felix, &replier, "!>>hello nobody,bob").await,
            vec![Sent::Private("bob".into(), "!hello: Hi".into())]
        );
    }

    #[tokio::test]
    async fn ignores_unrelated_messages() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        send(&felix, &replier, "!addcmd hello Hi").await;

        assert_eq!(send(&felix, &replier, "hello").await, vec![]);
        assert_eq!(send(&felix, &replier, "?hello").await, vec![]);
        assert_eq!(send(&felix, &replier, "!").await, vec![]);
        assert_eq!(send(&felix, &replier, "!missing").await, vec![]);

        felix
            .process_message(&said("bot", "!hello"), &replier)
            .await
            .expect("processed");
        assert_eq!(replier.take(), vec![]);
    }

    #[tokio::test]
    async fn parent_commands_send_nothing() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        felix
            .registry
            .edit(|table| {
                table.put(PhysicalCommand::new("parent", Vec::<String>::new()));
                crate::registry::Edit::Commit(())
            })
            .await
            .expect("writable");

        assert_eq!(send(&felix, &replier, "!parent").await, vec![]);
    }

    #[tokio::test]
    async fn forwards_to_custom_commands() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        felix.add_custom_command("Echo", Arc::new(EchoCommand)).await;

        assert_eq!(send(&felix, &replier, "!echo a \"b c\"").await, channel(&["echo|a|b c"]));
        assert_eq!(send(&felix, &replier, "!<echo").await, channel(&["<echo"]));
        assert_eq!(send(&felix, &replier, "!>echo bob").await, channel(&[">echo|bob"]));
        assert_eq!(send(&felix, &replier, "!>>ECHO").await, channel(&[">>ECHO"]));

        let sent = send(&felix, &replier, "!addcmd echo shadowed").await;
        assert_eq!(
            sent,
            vec![Sent::Requester("Sorry, but 'echo' is a reserved command name.".into())]
        );
    }

    #[tokio::test]
    async fn custom_commands_answer_with_any_target() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        felix
            .add_custom_command("ping", Arc::new(crate::custom_command::fn_command(|_, _| Ok(vec!["pong".into()]))))
            .await;

        for text in ["!ping", "!<ping", "!>ping bob", "!>>ping bob"] {
            assert_eq!(send(&felix, &replier, text).await, channel(&["pong"]), "{text}");
        }
    }

    #[tokio::test]
    async fn irc_management_notices_reset_formatting() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();

        let message = IncomingMessage::new(Platform::Irc, "alice", "alice", "!addcmd hello Hi");
        felix.process_message(&message, &replier).await.expect("processed");

        assert_eq!(
            replier.take(),
            vec![Sent::Requester("Command '\x0f!hello\x0f' has been set to '\x0fHi\x0f'.".into())]
        );
        assert_eq!(send(&felix, &replier, "!hello").await, channel(&["!hello: Hi"]));
    }

    #[tokio::test]
    async fn reports_custom_command_failures() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        felix.add_custom_command("fail", Arc::new(FailingCommand)).await;

        let result = felix.process_message(&said("alice", "!fail now"), &replier).await;

        assert!(matches!(result, Err(ServerError::CustomCommand { ref name, .. }) if name == "fail"));
        assert_eq!(replier.take(), vec![Sent::Requester(UNEXPECTED_ERROR.into())]);
    }

    #[tokio::test]
    async fn rejects_fourth_value() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::operator();
        for value in ["one", "two", "three"] {
            send(&felix, &replier, &format!("!addcmd -v hello {value}")).await;
        }

        let sent = send(&felix, &replier, "!addcmd -v hello four").await;
        assert_eq!(
            sent,
            vec![Sent::Requester(
                "I'm sorry, but that command has reached the value limit (3).".into()
            )]
        );
        assert_eq!(
            send(&felix, &replier, "!hello").await,
            channel(&["!hello: one", "!hello: two", "!hello: three"])
        );
    }

    #[tokio::test]
    async fn management_requires_permission() {
        let dir = tempdir().expect("tempdir");
        let felix = felix_in(&dir);
        let replier = RecordingReplier::user();

        let sent = send(&felix, &replier, "!addcmd hello Hi").await;
        assert_eq!(
            sent,
            vec![Sent::Requester("You don't have permission to modify commands.".into())]
        );
        assert_eq!(send(&felix, &replier, "!hello").await, vec![]);
    }

    #[test]
    fn splits_victims_under_the_cap() {
        assert_eq!(split_victims("bob"), Some(vec!["bob"]));
        assert_eq!(split_victims(" bob , carol "), Some(vec!["bob", "carol"]));
        assert_eq!(split_victims("bob,"), Some(vec!["bob"]));
        assert_eq!(split_victims("bob,,carol"), None);
        assert_eq!(split_victims("a,b,c"), None);
    }
}
