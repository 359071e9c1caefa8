//! Bandwidth limiting and traffic shaping

use std::time::Duration;

/// Bandwidth limiter for rate control
#[derive(Debug)]
pub struct BandwidthLimiter {
    /// Maximum bytes per second
    max_bps: u64,
    /// Current window start
    #[allow(dead_code)]
    window_start: std::time::Instant,
    /// Bytes sent in current window
    #[allow(dead_code)]
    bytes_sent: u64,
}

impl BandwidthLimiter {
    /// Create a new bandwidth limiter
    pub fn new(max_bps: u64) -> Self {
        Self {
            max_bps,
            window_start: std::time::Instant::now(),
            bytes_sent: 0,
        }
    }

    /// Wait if necessary to respect rate limit
    pub async fn wait_if_needed(&mut self, _bytes: usize) -> Duration {
        todo!("Implement bandwidth limiting")
    }

    /// Get current throughput estimate
    pub fn current_throughput(&self) -> u64 {
        self.max_bps
    }
}
