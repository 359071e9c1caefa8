//! Chunking strategy and adaptive sizing

/// Chunk configuration
#[derive(Debug, Clone)]
pub struct ChunkConfig {
    /// Chunk size in bytes
    pub size: usize,
    /// Minimum chunk size
    pub min_size: usize,
    /// Maximum chunk size
    pub max_size: usize,
}

impl ChunkConfig {
    /// Create default chunk config
    pub fn new() -> Self {
        Self {
            size: 256 * 1024,      // 256 KB default
            min_size: 64 * 1024,   // 64 KB min
            max_size: 4 * 1024 * 1024, // 4 MB max
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate adaptive chunk size based on network conditions
pub fn adaptive_chunk_size(_throughput_bps: u64, _rtt_ms: u64) -> usize {
    todo!("Implement adaptive chunk sizing")
}
