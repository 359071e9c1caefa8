//! Chat protocol

pub mod encrypt;
pub mod message;
pub mod session;

pub use encrypt::{decrypt_chat_text, encrypt_chat_text, ChatCryptoError, MAX_CHAT_MESSAGE_SIZE};
pub use message::ChatMessage;
pub use session::ChatSession;
