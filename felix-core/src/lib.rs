pub mod error;
pub mod interface;
pub mod model;

/// 管理コマンドの名前。ユーザーはこれらをエイリアスとして登録できない。
pub const MANAGEMENT_COMMAND_NAMES: &[&str] = &["addalias", "addcmd", "cmdinfo", "delcmd", "setcmd", "unsetcmd"];

/// `USER_PUBLIC`/`USER_PRIVATE` で一度に指定できる宛先数の上限(この数以上は送信しない)。
pub const MAX_TARGETS: usize = 3;

/// 1 つのコマンドが持てる値の最大数。
pub const MAX_RESPONSES: usize = 3;
