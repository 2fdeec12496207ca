mod inner;

use crate::{felix::inner::FelixInner, registry::CommandRegistry};

use std::sync::Arc;

use felix_core::{
    error::ServerError,
    interface::{custom_command::ArcCustomCommand, reply::Replier, server::FelixServer},
    model::message::IncomingMessage,
};
use futures::{FutureExt, future::BoxFuture};

/// 全プラットフォームで共有されるコマンド処理系。
#[derive(Clone)]
pub struct Felix(Arc<FelixInner>);

impl Felix {
    pub fn new(registry: CommandRegistry) -> Felix {
        Felix(Arc::new(FelixInner::new(registry)))
    }

    /// `CustomCommand` を登録する。`name` はユーザーが使えない名前になる。
    pub async fn add_custom_command(&self, name: &str, command: ArcCustomCommand) {
        self.0.add_custom_command(name, command).await;
    }
}

impl FelixServer for Felix {
    fn process_message<'a>(
        &'a self,
        message: &'a IncomingMessage,
        replier: &'a dyn Replier,
    ) -> BoxFuture<'a, Result<(), ServerError>> {
        async move { self.0.process_message(message, replier).await }.boxed()
    }
}
