//! Encrypted key-value store

use crate::Result;
use std::collections::HashMap;

/// Encrypted key-value store
#[derive(Debug)]
pub struct EncryptedKv {
    #[allow(dead_code)]
    store: HashMap<String, Vec<u8>>,
}

impl EncryptedKv {
    /// Create a new encrypted KV store
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    /// Get a value
    pub fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        todo!("Implement encrypted get")
    }

    /// Set a value
    pub fn set(&mut self, _key: &str, _value: &[u8]) -> Result<()> {
        todo!("Implement encrypted set")
    }

    /// Delete a value
    pub fn delete(&mut self, _key: &str) -> Result<()> {
        todo!("Implement encrypted delete")
    }
}

impl Default for EncryptedKv {
    fn default() -> Self {
        Self::new()
    }
}
