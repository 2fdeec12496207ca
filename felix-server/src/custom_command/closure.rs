use felix_core::{
    error::CommandError,
    interface::{custom_command::CustomCommand, reply::Replier},
    model::message::IncomingMessage,
};
use futures::{FutureExt, future::BoxFuture};

type BoxedSyncClosure =
    Box<dyn Send + Sync + for<'a> Fn(&'a [String], &'a IncomingMessage) -> Result<Vec<String>, CommandError>>;

/// 返信する行を返すだけの同期関数をカスタムコマンドとして扱う。
/// 返された行はメッセージを受け取ったチャンネルに送られる。
pub struct SyncClosure(BoxedSyncClosure);

impl CustomCommand for SyncClosure {
    fn process<'a>(
        &'a self,
        tokens: &'a [String],
        message: &'a IncomingMessage,
        replier: &'a dyn Replier,
    ) -> BoxFuture<'a, Result<(), CommandError>> {
        async move {
            let lines = (self.0)(tokens, message)?;
            if !lines.is_empty() {
                replier.send_channel(&lines).await?;
            }
            Ok(())
        }
        .boxed()
    }
}

pub fn fn_command<F>(f: F) -> SyncClosure
where
    F: Send + Sync + for<'a> Fn(&'a [String], &'a IncomingMessage) -> Result<Vec<String>, CommandError> + 'static,
{
    SyncClosure(Box::new(f))
}
