//! Metadata stripping for privacy

use crate::Result;

/// Strip EXIF data from images
pub fn strip_exif(_data: &[u8]) -> Result<Vec<u8>> {
    todo!("Implement EXIF stripping")
}

/// Strip metadata from various file types
pub fn strip_metadata(_data: &[u8], _file_type: &str) -> Result<Vec<u8>> {
    todo!("Implement metadata stripping")
}
