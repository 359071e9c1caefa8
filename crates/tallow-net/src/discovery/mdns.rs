//! mDNS-based local network discovery

use crate::Result;
use std::net::SocketAddr;

/// mDNS peer discovery
#[derive(Debug)]
pub struct MdnsDiscovery {
    #[allow(dead_code)]
    service_name: String,
    #[allow(dead_code)]
    peers: Vec<DiscoveredPeer>,
}

/// Discovered peer information
#[derive(Debug, Clone)]
pub struct DiscoveredPeer {
    /// Peer identifier
    pub id: String,
    /// Peer address
    pub addr: SocketAddr,
    /// Device name
    pub name: String,
}

impl MdnsDiscovery {
    /// Create a new mDNS discovery instance
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            peers: Vec::new(),
        }
    }

    /// Start discovery
    pub async fn start(&mut self) -> Result<()> {
        todo!("Implement mDNS discovery start")
    }

    /// Stop discovery
    pub async fn stop(&mut self) -> Result<()> {
        todo!("Implement mDNS discovery stop")
    }

    /// Get discovered peers
    pub fn discovered_peers(&self) -> &[DiscoveredPeer] {
        &self.peers
    }
}
