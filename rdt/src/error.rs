//! Error types.
//!
//! Protocol anomalies (bad checksums, duplicates, stale ACKs) are never
//! errors; they are filtered and counted. Errors only come out of
//! configuration and construction.

use core::fmt;

/// Errors raised while configuring a session or a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Segment size must be at least one byte.
    ZeroSegmentSize,

    /// Window capacity must be at least one byte.
    ZeroWindowCapacity,

    /// The window spans more segments than `MAX_SEGMENTS_PER_WINDOW`.
    WindowTooLarge {
        /// Segments per window derived from the configuration.
        segments: usize,
    },

    /// A fault probability lies outside `[0.0, 1.0]`.
    InvalidProbability {
        /// Name of the offending setting.
        name: &'static str,
    },

    /// Delays are enabled but the maximum delay is zero.
    ZeroMaxDelay,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ZeroSegmentSize => write!(f, "Segment size must be non-zero"),
            Error::ZeroWindowCapacity => write!(f, "Window capacity must be non-zero"),
            Error::WindowTooLarge { segments } => write!(
                f,
                "Window spans {} segments, maximum is {}",
                segments,
                crate::MAX_SEGMENTS_PER_WINDOW
            ),
            Error::InvalidProbability { name } => {
                write!(f, "Probability `{}` must be within [0.0, 1.0]", name)
            }
            Error::ZeroMaxDelay => write!(f, "Delay rate is set but max delay is zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::WindowTooLarge { segments: 70 }.to_string(),
            "Window spans 70 segments, maximum is 64"
        );
        assert_eq!(
            Error::InvalidProbability { name: "drop_rate" }.to_string(),
            "Probability `drop_rate` must be within [0.0, 1.0]"
        );
    }
}
