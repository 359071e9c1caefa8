//! Transfer pipeline and state management

pub mod send;
pub mod receive;
pub mod chunking;
pub mod state_machine;
pub mod manifest;
pub mod resume;
pub mod progress;

pub use send::SendPipeline;
pub use receive::ReceivePipeline;
pub use state_machine::{TransferState, TransferStateMachine};
pub use manifest::FileManifest;
pub use progress::TransferProgress;
