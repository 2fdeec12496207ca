mod closure;
mod simple;

pub use closure::fn_command;

use crate::felix::Felix;

use std::sync::Arc;

/// 起動時に組み込みのカスタムコマンドを登録する。
pub async fn register_builtin_commands(felix: &Felix) {
    felix.add_custom_command("ping", Arc::new(fn_command(simple::ping))).await;
}
