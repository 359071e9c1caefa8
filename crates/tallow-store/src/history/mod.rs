//! Transfer and chat history logging

pub mod chat;
pub mod log;

pub use chat::{ChatHistoryEntry, ChatLog, StoredChatMessage};
pub use log::{TransferDirection, TransferEntry, TransferLog, TransferStatus};
