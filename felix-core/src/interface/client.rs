use crate::error::ClientError;

use futures::future::BoxFuture;

/// プラットフォームのクライアント。`execute` は接続を維持し続ける。
pub trait FelixClient: Send + Sync {
    fn execute(&self) -> BoxFuture<'static, Result<(), ClientError>>;
}
