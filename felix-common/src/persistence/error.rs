use std::{
    io::Error as IoError,
    path::{Path, PathBuf},
};

use serde_json::Error as SerdeJsonError;
use thiserror::Error as ThisError;

/// コマンドの保存先に関するエラー。どちらも対象のファイルを持つ。
#[derive(Debug, ThisError)]
pub enum PersistenceError {
    #[error("cannot access command store {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("command store {} is not a valid command list: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: SerdeJsonError,
    },
}

impl PersistenceError {
    pub fn by_io(path: &Path) -> impl FnOnce(IoError) -> PersistenceError + '_ {
        move |source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn by_serialization(path: &Path) -> impl FnOnce(SerdeJsonError) -> PersistenceError + '_ {
        move |source| PersistenceError::Serialization {
            path: path.to_path_buf(),
            source,
        }
    }

    /// 失敗した保存先のファイル。
    pub fn path(&self) -> &Path {
        match self {
            PersistenceError::Io { path, .. } | PersistenceError::Serialization { path, .. } => path,
        }
    }
}
