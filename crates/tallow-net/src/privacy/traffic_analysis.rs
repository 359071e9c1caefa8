//! Traffic analysis resistance

/// Traffic shaper for resisting traffic analysis
#[derive(Debug)]
pub struct TrafficShaper {
    /// Target constant rate in bytes/sec
    target_rate: u64,
}

impl TrafficShaper {
    /// Create a new traffic shaper
    pub fn new(target_rate: u64) -> Self {
        Self { target_rate }
    }

    /// Shape traffic to constant rate
    pub async fn constant_rate(&mut self, _data: &[u8]) -> Vec<u8> {
        todo!("Implement constant-rate shaping")
    }

    /// Pad packet to fixed size
    pub fn pad_packet(&self, data: &[u8], target_size: usize) -> Vec<u8> {
        let mut padded = data.to_vec();
        if padded.len() < target_size {
            padded.resize(target_size, 0);
        }
        padded
    }

    /// Get current target rate
    pub fn target_rate(&self) -> u64 {
        self.target_rate
    }
}
