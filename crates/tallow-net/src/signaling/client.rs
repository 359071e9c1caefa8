//! Signaling client implementation

use crate::Result;
use super::protocol::SignalingMessage;

/// Signaling client for coordinating with peers
#[derive(Debug)]
pub struct SignalingClient {
    #[allow(dead_code)]
    server_url: String,
}

impl SignalingClient {
    /// Create a new signaling client
    pub fn new(server_url: String) -> Self {
        Self { server_url }
    }

    /// Connect to signaling server
    pub async fn connect(&mut self) -> Result<()> {
        todo!("Implement signaling connection")
    }

    /// Send a signaling message
    pub async fn send(&mut self, _msg: SignalingMessage) -> Result<()> {
        todo!("Implement signaling send")
    }

    /// Receive a signaling message
    pub async fn receive(&mut self) -> Result<SignalingMessage> {
        todo!("Implement signaling receive")
    }
}
