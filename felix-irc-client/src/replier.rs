use felix_core::{error::ClientError, interface::reply::Replier};
use futures::{FutureExt, future::BoxFuture};
use irc::client::{
    Sender,
    data::{AccessLevel, User},
};

/// メッセージを受け取った時点のチャンネル参加者。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMember {
    pub nickname: String,
    pub operator: bool,
}

impl IrcMember {
    pub fn from_user(user: &User) -> IrcMember {
        IrcMember {
            nickname: user.get_nickname().to_string(),
            operator: user.access_levels().contains(&AccessLevel::Oper),
        }
    }
}

/// チャンネルへの PRIVMSG と、ユーザーへの NOTICE で返信する。
pub struct IrcReplier {
    sender: Sender,
    channel: String,
    requester: String,
    members: Vec<IrcMember>,
}

impl IrcReplier {
    pub fn new(sender: Sender, channel: String, requester: String, members: Vec<IrcMember>) -> IrcReplier {
        IrcReplier {
            sender,
            channel,
            requester,
            members,
        }
    }

    fn member(&self, nickname: &str) -> Option<&IrcMember> {
        self.members.iter().find(|m| m.nickname.eq_ignore_ascii_case(nickname))
    }

    fn notice(&self, nickname: &str, lines: &[String]) -> Result<(), ClientError> {
        for line in lines {
            self.sender
                .send_notice(nickname, line)
                .map_err(ClientError::by_communication)?;
        }
        Ok(())
    }
}

impl Replier for IrcReplier {
    fn send_channel<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        async move {
            for line in lines {
                self.sender
                    .send_privmsg(&self.channel, line)
                    .map_err(ClientError::by_communication)?;
            }
            Ok(())
        }
        .boxed()
    }

    fn send_private<'a>(&'a self, user: &'a str, lines: &'a [String]) -> BoxFuture<'a, Result<bool, ClientError>> {
        async move {
            let Some(member) = self.member(user) else {
                return Ok(false);
            };
            self.notice(&member.nickname, lines)?;
            Ok(true)
        }
        .boxed()
    }

    fn notify_requester<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        async move { self.notice(&self.requester, lines) }.boxed()
    }

    fn can_manage_commands(&self) -> BoxFuture<'_, bool> {
        async move { self.member(&self.requester).is_some_and(|m| m.operator) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_are_detected_from_channel_mode() {
        let alice = IrcMember::from_user(&User::new("@alice"));
        let bob = IrcMember::from_user(&User::new("+bob"));
        let carol = IrcMember::from_user(&User::new("carol"));

        assert_eq!(
            alice,
            IrcMember {
                nickname: "alice".into(),
                operator: true
            }
        );
        assert!(!bob.operator);
        assert_eq!(bob.nickname, "bob");
        assert!(!carol.operator);
    }
}
