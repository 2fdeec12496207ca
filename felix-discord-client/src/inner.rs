use crate::replier::DiscordReplier;

use std::{collections::HashSet, sync::Arc};

use felix_common::config::client::ConfigClientDiscord;
use felix_core::{
    error::ClientError,
    interface::server::FelixServer,
    model::message::{IncomingMessage, Platform},
};
use futures::{FutureExt, TryFutureExt, future::BoxFuture};
use serenity::{
    Client as SerenityClient,
    all::{Context, EventHandler, GatewayIntents, Message as SerenityMessage, Ready, UserId},
};
use tokio::sync::RwLock;
use tracing::{error, info};

pub struct DiscordFelixClientInner<S> {
    token: String,
    operators: HashSet<String>,
    bot_user: RwLock<Option<UserId>>,
    server: S,
}

impl<S: FelixServer> EventHandler for DiscordFelixClientInner<S> {
    fn ready<'a, 't>(&'a self, ctx: Context, ready: Ready) -> BoxFuture<'t, ()>
    where
        'a: 't,
        Self: 't,
    {
        do_event(self.on_ready(ctx, ready))
    }

    fn message<'a, 't>(&'a self, ctx: Context, new_message: SerenityMessage) -> BoxFuture<'t, ()>
    where
        'a: 't,
        Self: 't,
    {
        do_event(self.on_message(ctx, new_message))
    }
}

impl<S: FelixServer> DiscordFelixClientInner<S> {
    pub fn new(config: &ConfigClientDiscord, server: S) -> DiscordFelixClientInner<S> {
        DiscordFelixClientInner {
            token: config.token.clone(),
            operators: config.operators.iter().cloned().collect(),
            bot_user: RwLock::new(None),
            server,
        }
    }

    pub async fn execute(self: Arc<Self>) -> Result<(), ClientError> {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;
        let mut discord = SerenityClient::builder(&self.token, intents)
            .event_handler_arc(self.clone())
            .await
            .map_err(ClientError::by_external)?;

        discord.start().map_err(ClientError::by_communication).await?;
        Ok(())
    }

    async fn on_ready(&self, _ctx: Context, ready: Ready) -> Result<(), ClientError> {
        info!("Discord client got ready: [{}] {}", ready.user.id, ready.user.name);

        let mut bot_user = self.bot_user.write().await;
        *bot_user = Some(ready.user.id);
        Ok(())
    }

    async fn on_message(&self, ctx: Context, message: SerenityMessage) -> Result<(), ClientError> {
        // 自分のメッセージには応答しない
        let bot_user = *self.bot_user.read().await;
        if bot_user.is_none_or(|id| id == message.author.id) {
            return Ok(());
        }

        let sender_id = message.author.id.to_string();
        let incoming = IncomingMessage::new(
            Platform::Discord,
            &sender_id,
            &message.author.name,
            &message.content,
        );
        let replier = DiscordReplier::new(
            ctx,
            message.channel_id,
            message.guild_id,
            message.author.id,
            self.operators.contains(&sender_id),
        );

        self.server
            .process_message(&incoming, &replier)
            .map_err(ClientError::by_external)
            .await?;
        Ok(())
    }
}

fn do_event<'t>(event_future: impl Future<Output = Result<(), ClientError>> + Send + 't) -> BoxFuture<'t, ()> {
    async {
        match event_future.await {
            Ok(()) => (),
            Err(err) => {
                error!("Discord event process reported error: {err}");
            }
        }
    }
    .boxed()
}
