use felix_core::{error::ClientError, interface::reply::Replier};
use futures::{FutureExt, TryFutureExt, future::BoxFuture};
use serenity::all::{ChannelId, Context, CreateMessage, GuildId, UserId};

/// 受け取ったチャンネルへの投稿と、ユーザーへの DM で返信する。
pub struct DiscordReplier {
    ctx: Context,
    channel_id: ChannelId,
    guild_id: Option<GuildId>,
    author: UserId,
    operator: bool,
}

impl DiscordReplier {
    pub fn new(
        ctx: Context,
        channel_id: ChannelId,
        guild_id: Option<GuildId>,
        author: UserId,
        operator: bool,
    ) -> DiscordReplier {
        DiscordReplier {
            ctx,
            channel_id,
            guild_id,
            author,
            operator,
        }
    }

    /// ギルドのメンバーキャッシュから名前でユーザーを探す。DM では常に `None`。
    fn find_member(&self, name: &str) -> Option<UserId> {
        let guild = self.ctx.cache.guild(self.guild_id?)?;
        guild.member_named(name).map(|m| m.user.id)
    }

    async fn direct_message(&self, user: UserId, lines: &[String]) -> Result<(), ClientError> {
        user.direct_message(&self.ctx, CreateMessage::new().content(lines.join("\n")))
            .map_err(ClientError::by_communication)
            .await?;
        Ok(())
    }
}

impl Replier for DiscordReplier {
    fn send_channel<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        async move {
            self.channel_id
                .say(&self.ctx, lines.join("\n"))
                .map_err(ClientError::by_communication)
                .await?;
            Ok(())
        }
        .boxed()
    }

    fn send_private<'a>(&'a self, user: &'a str, lines: &'a [String]) -> BoxFuture<'a, Result<bool, ClientError>> {
        async move {
            let Some(user_id) = self.find_member(user) else {
                return Ok(false);
            };
            self.direct_message(user_id, lines).await?;
            Ok(true)
        }
        .boxed()
    }

    fn notify_requester<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        async move { self.direct_message(self.author, lines).await }.boxed()
    }

    fn can_manage_commands(&self) -> BoxFuture<'_, bool> {
        async move { self.operator }.boxed()
    }
}
