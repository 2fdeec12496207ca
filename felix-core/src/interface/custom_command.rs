use crate::{
    error::CommandError,
    interface::reply::Replier,
    model::message::IncomingMessage,
};

use std::sync::Arc;

use futures::future::BoxFuture;

pub type ArcCustomCommand = Arc<dyn CustomCommand + 'static>;

/// エイリアス・値のモデルに収まらない、起動時に登録されるコマンド。
pub trait CustomCommand: Send + Sync {
    /// `tokens` はプレフィックスを除いて分割した元のトークン列全体(先頭はコマンド名)。
    fn process<'a>(
        &'a self,
        tokens: &'a [String],
        message: &'a IncomingMessage,
        replier: &'a dyn Replier,
    ) -> BoxFuture<'a, Result<(), CommandError>>;
}

