use crate::persistence::PersistenceError;

use std::{
    fs::read_to_string,
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use felix_core::model::command::PhysicalCommand;
use tempfile::NamedTempFile;
use tracing::debug;

/// `PhysicalCommand` の配列を 1 つの JSON ファイルとして保存する。
/// 変更のたびにファイル全体を書き直す。
#[derive(Debug, Clone)]
pub struct JsonCommandStore {
    path: PathBuf,
}

impl JsonCommandStore {
    pub fn new(path: impl Into<PathBuf>) -> JsonCommandStore {
        JsonCommandStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存されているコマンドを読み込む。ファイルがなければ空。
    pub fn load(&self) -> Result<Vec<PhysicalCommand>, PersistenceError> {
        let json = match read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("command store {} does not exist yet", self.path.display());
                return Ok(vec![]);
            }
            Err(e) => return Err(PersistenceError::by_io(&self.path)(e)),
        };

        let commands: Vec<PhysicalCommand> = serde_json::from_str(&json).map_err(PersistenceError::by_serialization(&self.path))?;
        Ok(commands.into_iter().map(PhysicalCommand::normalized).collect())
    }

    /// コマンドを書き込む。一時ファイルに書いてから置き換えるので、途中で失敗しても元のファイルは残る。
    pub fn save<'a>(&self, commands: impl IntoIterator<Item = &'a PhysicalCommand>) -> Result<(), PersistenceError> {
        let commands: Vec<_> = commands.into_iter().collect();

        let directory = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let temp_file = NamedTempFile::new_in(directory).map_err(PersistenceError::by_io(&self.path))?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer(&mut writer, &commands).map_err(PersistenceError::by_serialization(&self.path))?;
            writer.flush().map_err(PersistenceError::by_io(&self.path))?;
        }
        temp_file.as_file().sync_all().map_err(PersistenceError::by_io(&self.path))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| PersistenceError::by_io(&self.path)(e.error))?;

        debug!("{} command(s) written to {}", commands.len(), self.path.display());
        Ok(())
    }
}
