//! Session management and conversation handling
//!
//! This module provides the chat transcript types, the key-value backed
//! session store and the conversation flow that ties them to the resolver.

mod chat;
mod conversation;
mod store;

pub use chat::*;
pub use conversation::*;
pub use store::*;
