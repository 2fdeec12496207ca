use std::{
    collections::{HashMap, HashSet},
    io::Error as IoError,
    sync::Arc,
};

use felix_common::persistence::{JsonCommandStore, PersistenceError};
use felix_core::{MANAGEMENT_COMMAND_NAMES, model::command::PhysicalCommand};
use tokio::{sync::RwLock, task::spawn_blocking};
use tracing::info;

/// エイリアスから `PhysicalCommand` への対応表。
/// 同じコマンドの全エイリアスは同じ `Arc` を指す。
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    by_alias: HashMap<String, Arc<PhysicalCommand>>,
}

impl CommandTable {
    pub fn get(&self, name: &str) -> Option<&Arc<PhysicalCommand>> {
        self.by_alias.get(&name.to_lowercase())
    }

    /// 既存のコマンドの複製か、まだ登録されていない空のコマンドを返す。
    pub fn get_or_create(&self, name: &str) -> PhysicalCommand {
        self.get(name).map(|c| PhysicalCommand::clone(c)).unwrap_or_default()
    }

    /// `command` の全エイリアスを登録する。既存の対応は上書きされる。
    pub fn put(&mut self, command: PhysicalCommand) {
        let command = Arc::new(command);
        for alias in &command.aliases {
            self.by_alias.insert(alias.to_lowercase(), command.clone());
        }
    }

    /// `command` の全エイリアスを削除する。
    pub fn remove(&mut self, command: &PhysicalCommand) {
        for alias in &command.aliases {
            self.by_alias.remove(&alias.to_lowercase());
        }
    }

    /// 重複を除いた全コマンド。最初のエイリアス順に並ぶ。
    pub fn commands(&self) -> Vec<&PhysicalCommand> {
        let mut seen = HashSet::new();
        let mut commands: Vec<_> = self
            .by_alias
            .values()
            .filter(|c| seen.insert(Arc::as_ptr(c)))
            .map(|c| c.as_ref())
            .collect();
        commands.sort_by(|a, b| a.first_alias().cmp(&b.first_alias()));
        commands
    }
}

/// `CommandRegistry::edit` に渡す処理の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    /// 変更を永続化して反映する。
    Commit(T),

    /// 変更を捨てる。
    Discard(T),
}

/// プロセス全体で 1 つのコマンド登録簿。
///
/// 変更は書き込みロックを取った状態で下書きに適用され、ファイルへの保存が成功してから差し替えられる。
/// 保存に失敗した変更は他のスレッドから観測されない。
#[derive(Debug)]
pub struct CommandRegistry {
    prefix: char,
    ignore: HashSet<String>,
    reserved: RwLock<HashSet<String>>,
    table: RwLock<CommandTable>,
    store: JsonCommandStore,
}

impl CommandRegistry {
    pub fn load(
        store: JsonCommandStore,
        prefix: char,
        ignore: impl IntoIterator<Item = String>,
    ) -> Result<CommandRegistry, PersistenceError> {
        let mut table = CommandTable::default();
        for command in store.load()? {
            table.put(command);
        }
        info!(
            "{} command(s) loaded from {}",
            table.commands().len(),
            store.path().display()
        );

        Ok(CommandRegistry {
            prefix,
            ignore: ignore.into_iter().collect(),
            reserved: RwLock::new(MANAGEMENT_COMMAND_NAMES.iter().map(|n| n.to_string()).collect()),
            table: RwLock::new(table),
            store,
        })
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn is_ignored(&self, sender: &str) -> bool {
        self.ignore.contains(sender)
    }

    pub async fn is_reserved(&self, name: &str) -> bool {
        self.reserved.read().await.contains(&name.to_lowercase())
    }

    pub async fn reserved_names(&self) -> HashSet<String> {
        self.reserved.read().await.clone()
    }

    /// ユーザーがエイリアスとして登録できない名前を追加する。
    pub async fn reserve(&self, name: &str) {
        self.reserved.write().await.insert(name.to_lowercase());
    }

    pub async fn get(&self, name: &str) -> Option<Arc<PhysicalCommand>> {
        self.table.read().await.get(name).cloned()
    }

    /// 登録簿を変更する。`Edit::Commit` なら保存してから反映し、保存に失敗したら変更は捨てられる。
    pub async fn edit<T>(&self, f: impl FnOnce(&mut CommandTable) -> Edit<T>) -> Result<T, PersistenceError> {
        let mut locked = self.table.write().await;
        let mut draft = locked.clone();
        match f(&mut draft) {
            Edit::Commit(value) => {
                self.save(&draft).await?;
                *locked = draft;
                Ok(value)
            }
            Edit::Discard(value) => Ok(value),
        }
    }

    /// 現在の内容をそのまま保存する。
    pub async fn write(&self) -> Result<(), PersistenceError> {
        let locked = self.table.read().await;
        self.save(&locked).await
    }

    /// ファイル書き込みはブロッキングスレッドで行う。呼び出し側はロックを持ったまま待つ。
    async fn save(&self, table: &CommandTable) -> Result<(), PersistenceError> {
        let commands: Vec<_> = table.commands().into_iter().cloned().collect();
        let store = self.store.clone();
        spawn_blocking(move || store.save(&commands))
            .await
            .map_err(|e| PersistenceError::by_io(self.store.path())(IoError::other(e)))?
    }
}
