mod command_json;
mod error;

pub use command_json::JsonCommandStore;
pub use error::PersistenceError;
