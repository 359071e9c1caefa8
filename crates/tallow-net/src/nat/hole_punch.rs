//! UDP hole punching for NAT traversal

use crate::Result;
use std::net::SocketAddr;

/// Attempt UDP hole punching between two peers
pub async fn punch_hole(_local: SocketAddr, _remote: SocketAddr) -> Result<()> {
    todo!("Implement UDP hole punching")
}
