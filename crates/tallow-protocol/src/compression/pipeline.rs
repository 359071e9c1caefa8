//! Compression pipeline with automatic algorithm selection

use super::CompressionAlgorithm;
use crate::Result;

/// Compression pipeline
#[derive(Debug)]
pub struct CompressionPipeline {
    #[allow(dead_code)]
    algorithm: CompressionAlgorithm,
}

impl CompressionPipeline {
    /// Create a new compression pipeline
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Analyze data and compress with best algorithm
    pub fn analyze_and_compress(&self, _data: &[u8]) -> Result<(CompressionAlgorithm, Vec<u8>)> {
        todo!("Implement compression pipeline")
    }
}
