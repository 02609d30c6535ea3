//! Wire-level building blocks.
//!
//! - Segment: unit exchanged over the channel (sequence, ACK, payload, checksum)
//! - Message: outbound data and its fragmentation into segments
//! - Checksum: CRC32 used to detect corruption in transit

mod checksum;
mod message;
mod segment;

pub use checksum::Crc32;
pub use message::Message;
pub use segment::Segment;
