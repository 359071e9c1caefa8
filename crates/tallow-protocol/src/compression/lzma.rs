//! LZMA/XZ compression

use crate::Result;

/// Compress data with LZMA
pub fn compress(_data: &[u8], _preset: u32) -> Result<Vec<u8>> {
    todo!("Implement LZMA compression")
}

/// Decompress LZMA data
pub fn decompress(_data: &[u8]) -> Result<Vec<u8>> {
    todo!("Implement LZMA decompression")
}
