use crate::replier::{IrcMember, IrcReplier};

use std::{sync::Arc, time::Duration};

use felix_common::config::client::ConfigClientIrc;
use felix_core::{
    error::ClientError,
    interface::server::FelixServer,
    model::message::{IncomingMessage, Platform},
};
use futures::prelude::*;
use irc::client::prelude::{ChannelExt, Client, Command, Config as IrcConfig, Message};
use tokio::{spawn, time::sleep};
use tracing::{debug, error, info, warn};

const RECONNECT_SLEEP: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct IrcFelixClientInner<S> {
    server: S,
    irc_config: IrcConfig,
}

impl<S: FelixServer> IrcFelixClientInner<S> {
    pub fn new(config: &ConfigClientIrc, server: S) -> IrcFelixClientInner<S> {
        let irc_config = IrcConfig {
            nickname: Some(config.nick.clone()),
            username: Some(config.nick.clone()),
            realname: Some(config.nick.clone()),
            server: Some(config.host.clone()),
            port: Some(config.port),
            use_tls: Some(config.ssl),
            password: config.password.clone(),
            channels: config.channels.clone(),
            ..IrcConfig::default()
        };

        IrcFelixClientInner { server, irc_config }
    }

    pub async fn execute(self: Arc<Self>) -> Result<(), ClientError> {
        loop {
            match self.clone().run_session().await {
                Ok(()) => warn!("IRC connection closed by the server"),
                Err(e) => error!("IRC connection lost: {e}"),
            }
            warn!("trying to reconnect to IRC, waiting...");
            sleep(RECONNECT_SLEEP).await;
        }
    }

    /// 接続してから切断されるまでメッセージを処理する。
    async fn run_session(self: Arc<Self>) -> Result<(), ClientError> {
        let mut client = Client::from_config(self.irc_config.clone())
            .map_err(ClientError::by_communication)
            .await?;
        client.identify().map_err(ClientError::by_communication)?;
        info!(
            "IRC client connected to {} as {}",
            self.irc_config.server.as_deref().unwrap_or_default(),
            client.current_nickname()
        );

        let mut stream = client.stream().map_err(ClientError::by_communication)?;
        while let Some(message) = stream.next().await {
            let message = message.map_err(ClientError::by_communication)?;
            if let Some(event) = self.intake(&client, message) {
                spawn(self.clone().process_event(event));
            }
        }
        Ok(())
    }

    /// 処理対象のチャンネルメッセージであれば、その時点のチャンネルの状態と一緒に取り出す。
    fn intake(&self, client: &Client, message: Message) -> Option<(IncomingMessage, IrcReplier)> {
        let nickname = message.source_nickname()?.to_string();
        let Command::PRIVMSG(channel, text) = message.command else {
            return None;
        };
        if !channel.is_channel_name() {
            return None;
        }
        if nickname.eq_ignore_ascii_case(client.current_nickname()) {
            debug!("skipping own message in {channel}");
            return None;
        }

        let members: Vec<_> = client
            .list_users(&channel)
            .unwrap_or_default()
            .iter()
            .map(IrcMember::from_user)
            .collect();
        let incoming = IncomingMessage::new(Platform::Irc, &nickname, &nickname, text);
        let replier = IrcReplier::new(client.sender(), channel, nickname, members);
        Some((incoming, replier))
    }

    async fn process_event(self: Arc<Self>, (message, replier): (IncomingMessage, IrcReplier)) {
        let Err(err) = self.server.process_message(&message, &replier).await else {
            return;
        };
        error!("IRC message process reported error: {err}");
    }
}
