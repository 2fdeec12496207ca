use std::error::Error as StdError;

use thiserror::Error as ThisError;

pub type ErasedError = Box<dyn StdError + Send + Sync + 'static>;

/// プラットフォームクライアントのエラー。
#[derive(Debug, ThisError)]
pub enum ClientError {
    #[error("communication error: {0}")]
    Communication(#[source] ErasedError),

    #[error("external error: {0}")]
    External(#[source] ErasedError),
}

impl ClientError {
    pub fn by_communication(source: impl Into<ErasedError>) -> ClientError {
        ClientError::Communication(source.into())
    }

    pub fn by_external(source: impl Into<ErasedError>) -> ClientError {
        ClientError::External(source.into())
    }
}

/// `CustomCommand` が報告するエラー。
#[derive(Debug, ThisError)]
pub enum CommandError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("command failed: {0}")]
    Failed(#[source] ErasedError),

    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

impl CommandError {
    pub fn by_failure(source: impl Into<ErasedError>) -> CommandError {
        CommandError::Failed(source.into())
    }
}

/// `FelixServer` がクライアントに返すエラー。
/// メッセージ 1 件の処理が失敗したことだけを表し、クライアントは処理を続けてよい。
#[derive(Debug, ThisError)]
pub enum ServerError {
    #[error("persistence error: {0}")]
    Persistence(#[source] ErasedError),

    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("custom command '{name}' failed: {source}")]
    CustomCommand {
        name: String,
        #[source]
        source: CommandError,
    },
}

impl ServerError {
    pub fn by_persistence(source: impl Into<ErasedError>) -> ServerError {
        ServerError::Persistence(source.into())
    }
}
