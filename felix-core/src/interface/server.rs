use crate::{error::ServerError, interface::reply::Replier, model::message::IncomingMessage};

use futures::future::BoxFuture;

/// 各プラットフォームのクライアントが共有するコマンド処理系。
pub trait FelixServer: Send + Sync + 'static {
    /// 受信したメッセージを 1 件処理する。
    /// 返信は `replier` を通して行われ、戻り値は処理の成否のみを表す。
    fn process_message<'a>(
        &'a self,
        message: &'a IncomingMessage,
        replier: &'a dyn Replier,
    ) -> BoxFuture<'a, Result<(), ServerError>>;
}
