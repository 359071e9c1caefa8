//! Command implementations

pub mod benchmark;
pub mod chat;
pub mod completions;
pub mod config_cmd;
pub mod doctor;
pub mod identity;
pub mod receive;
pub mod send;
pub mod sync;
pub mod tui_cmd;
pub mod version;
pub mod watch;
