//! Relay server client and directory

pub mod client;
pub mod directory;

pub use client::RelayClient;
pub use directory::RelayDirectory;
