use std::sync::Mutex;

use felix_core::{error::ClientError, interface::reply::Replier};
use futures::{FutureExt, future::BoxFuture};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(String),
    Private(String, String),
    Requester(String),
}

/// 送信内容を記録するだけの `Replier`。
#[derive(Debug, Default)]
pub struct RecordingReplier {
    operator: bool,
    members: Vec<String>,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingReplier {
    pub fn operator() -> RecordingReplier {
        RecordingReplier {
            operator: true,
            members: vec!["alice".into(), "bob".into(), "carol".into()],
            sent: Mutex::new(vec![]),
        }
    }

    pub fn user() -> RecordingReplier {
        RecordingReplier {
            operator: false,
            ..RecordingReplier::operator()
        }
    }

    /// 記録された送信内容を取り出す。
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().expect("poisoned"))
    }

    fn record(&self, sent: impl IntoIterator<Item = Sent>) {
        self.sent.lock().expect("poisoned").extend(sent);
    }
}

impl Replier for RecordingReplier {
    fn send_channel<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        self.record(lines.iter().cloned().map(Sent::Channel));
        async { Ok(()) }.boxed()
    }

    fn send_private<'a>(&'a self, user: &'a str, lines: &'a [String]) -> BoxFuture<'a, Result<bool, ClientError>> {
        let Some(member) = self.members.iter().find(|m| m.eq_ignore_ascii_case(user)) else {
            return async { Ok(false) }.boxed();
        };
        self.record(lines.iter().map(|l| Sent::Private(member.clone(), l.clone())));
        async { Ok(true) }.boxed()
    }

    fn notify_requester<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>> {
        self.record(lines.iter().cloned().map(Sent::Requester));
        async { Ok(()) }.boxed()
    }

    fn can_manage_commands(&self) -> BoxFuture<'_, bool> {
        let operator = self.operator;
        async move { operator }.boxed()
    }
}
