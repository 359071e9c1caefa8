//! TUI panels

pub mod status;
pub mod transfers;
pub mod devices;
pub mod hotkey_bar;

pub use status::StatusPanel;
pub use transfers::TransfersPanel;
pub use devices::DevicesPanel;
pub use hotkey_bar::HotkeyBar;
