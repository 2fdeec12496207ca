use crate::error::ClientError;

use futures::future::BoxFuture;

/// メッセージを受け取った場所への返信手段。プラットフォームのクライアントが実装する。
///
/// 複数行を渡すメソッドは、プラットフォームに応じて 1 行ずつ送っても 1 通にまとめてもよい。
pub trait Replier: Send + Sync {
    /// メッセージを受け取ったチャンネルに送る。
    fn send_channel<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>>;

    /// チャンネルにいる `user` に個別に送る。該当ユーザーがいなければ `Ok(false)`。
    fn send_private<'a>(&'a self, user: &'a str, lines: &'a [String]) -> BoxFuture<'a, Result<bool, ClientError>>;

    /// 要求者に個別に送る。
    fn notify_requester<'a>(&'a self, lines: &'a [String]) -> BoxFuture<'a, Result<(), ClientError>>;

    /// 要求者がこの場所でコマンドを管理できるかどうか。
    fn can_manage_commands(&self) -> BoxFuture<'_, bool>;
}
