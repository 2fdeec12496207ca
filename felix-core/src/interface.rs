pub mod client;
pub mod custom_command;
pub mod reply;
pub mod server;
