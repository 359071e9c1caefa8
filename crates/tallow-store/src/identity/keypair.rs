//! Identity keypair storage

use crate::Result;

/// Identity store for managing keypairs
#[derive(Debug)]
pub struct IdentityStore {
    #[allow(dead_code)]
    keypair: Option<Vec<u8>>,
}

impl IdentityStore {
    /// Create a new identity store
    pub fn new() -> Self {
        Self { keypair: None }
    }

    /// Generate a new keypair
    pub fn generate(&mut self) -> Result<()> {
        todo!("Implement keypair generation")
    }

    /// Export keypair
    pub fn export(&self) -> Result<Vec<u8>> {
        todo!("Implement keypair export")
    }

    /// Import keypair
    pub fn import(&mut self, _data: &[u8]) -> Result<()> {
        todo!("Implement keypair import")
    }

    /// Get public key
    pub fn public_key(&self) -> Option<&[u8]> {
        None
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new()
    }
}
