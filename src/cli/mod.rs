mod agents;
mod chat;
mod keys;
mod root;

pub use agents::AgentsCommand;
pub use chat::{ChatCommand, HistoryCommand};
pub use keys::KeysCommand;
pub use root::Cli;
