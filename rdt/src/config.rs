use crate::buffer::ReceiveWindowPolicy;
use crate::error::{Error, Result};
use crate::reliable::ResendPolicy;
use crate::{
    DEFAULT_IDLE_THRESHOLD, DEFAULT_SEGMENT_SIZE, DEFAULT_WINDOW_CAPACITY,
    MAX_SEGMENTS_PER_WINDOW,
};

/// Per-session protocol configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Payload bytes carried by one segment.
    pub segment_size: usize,

    /// Advertised flow-control window in bytes.
    pub window_capacity: usize,

    /// Consecutive idle ticks tolerated before a timeout is counted.
    pub idle_threshold: u32,

    /// What the send path does once the idle threshold is reached.
    pub resend_policy: ResendPolicy,

    /// Whether a receiving session slides its own window.
    pub receive_window: ReceiveWindowPolicy,
}

impl Config {
    pub fn new() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            resend_policy: ResendPolicy::default(),
            receive_window: ReceiveWindowPolicy::default(),
        }
    }

    pub fn with_segment_size(mut self, size: usize) -> Self {
        self.segment_size = size;
        self
    }

    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    pub fn with_idle_threshold(mut self, ticks: u32) -> Self {
        self.idle_threshold = ticks;
        self
    }

    pub fn with_resend_policy(mut self, policy: ResendPolicy) -> Self {
        self.resend_policy = policy;
        self
    }

    pub fn with_receive_window(mut self, policy: ReceiveWindowPolicy) -> Self {
        self.receive_window = policy;
        self
    }

    /// Number of segments that fit the advertised window, rounded up.
    ///
    /// Returns 0 for a zero segment size; `validate` rejects that case.
    pub fn segments_per_window(&self) -> usize {
        if self.segment_size == 0 {
            return 0;
        }
        self.window_capacity.div_ceil(self.segment_size)
    }

    pub fn validate(&self) -> Result<()> {
        if self.segment_size == 0 {
            return Err(Error::ZeroSegmentSize);
        }
        if self.window_capacity == 0 {
            return Err(Error::ZeroWindowCapacity);
        }
        let segments = self.segments_per_window();
        if segments > MAX_SEGMENTS_PER_WINDOW {
            return Err(Error::WindowTooLarge { segments });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = Config::default();
        assert_eq!(config.segment_size, 4);
        assert_eq!(config.window_capacity, 15);
        assert_eq!(config.segments_per_window(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_segments_round_up() {
        let config = Config::new().with_segment_size(5).with_window_capacity(16);
        assert_eq!(config.segments_per_window(), 4);

        let config = Config::new().with_segment_size(8).with_window_capacity(8);
        assert_eq!(config.segments_per_window(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        assert_eq!(
            Config::new().with_segment_size(0).validate(),
            Err(Error::ZeroSegmentSize)
        );
        assert_eq!(
            Config::new().with_window_capacity(0).validate(),
            Err(Error::ZeroWindowCapacity)
        );
        assert_eq!(
            Config::new()
                .with_segment_size(1)
                .with_window_capacity(65)
                .validate(),
            Err(Error::WindowTooLarge { segments: 65 })
        );
    }
}
