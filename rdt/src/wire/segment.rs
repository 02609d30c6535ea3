//! Segment definition.
//!
//! A segment is either a data segment (sequence number plus payload) or
//! an ACK-only segment (acknowledgment number, no payload). Both carry a
//! CRC32 checksum computed when the segment is built, so corruption
//! injected by the channel afterwards is detectable.

use alloc::vec::Vec;
use core::fmt;

use super::checksum::Crc32;

/// The unit exchanged over a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Sequence index of the payload; 0 on ACK-only segments.
    sequence: u32,

    /// Cumulative acknowledgment number, if any.
    ack: Option<u32>,

    /// Payload bytes; `None` on ACK-only segments.
    payload: Option<Vec<u8>>,

    /// Checksum over all fields above.
    checksum: u32,
}

impl Segment {
    /// Creates a data segment carrying `payload` at index `sequence`.
    pub fn data(sequence: u32, payload: impl Into<Vec<u8>>) -> Self {
        let mut segment = Self {
            sequence,
            ack: None,
            payload: Some(payload.into()),
            checksum: 0,
        };
        segment.checksum = segment.compute_checksum();
        segment
    }

    /// Creates an ACK-only segment.
    pub fn ack(ack: u32) -> Self {
        let mut segment = Self {
            sequence: 0,
            ack: Some(ack),
            payload: None,
            checksum: 0,
        };
        segment.checksum = segment.compute_checksum();
        segment
    }

    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    pub const fn ack_number(&self) -> Option<u32> {
        self.ack
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    pub const fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Returns true for segments that carry data.
    pub const fn is_data(&self) -> bool {
        self.payload.is_some()
    }

    /// Recomputes the checksum and compares it with the stored one.
    pub fn check_checksum(&self) -> bool {
        self.compute_checksum() == self.checksum
    }

    /// Flips one bit of the payload without touching the checksum.
    ///
    /// Returns false if there is no payload byte at `index`.
    pub fn corrupt_payload(&mut self, index: usize, bit: u8) -> bool {
        match self.payload.as_mut().and_then(|p| p.get_mut(index)) {
            Some(byte) => {
                *byte ^= 1 << (bit % 8);
                true
            }
            None => false,
        }
    }

    fn compute_checksum(&self) -> u32 {
        let mut crc = Crc32::new();
        crc.update_u32(self.sequence);
        match self.ack {
            Some(ack) => crc.update(&[1]).update_u32(ack),
            None => crc.update(&[0]),
        };
        match &self.payload {
            Some(payload) => crc.update(&[1]).update(payload),
            None => crc.update(&[0]),
        };
        crc.finalize()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq: {}, ack: ", self.sequence)?;
        match self.ack {
            Some(ack) => write!(f, "{}", ack)?,
            None => write!(f, "-")?,
        }
        write!(f, ", data: ")?;
        match self.payload.as_deref() {
            Some(bytes) => match core::str::from_utf8(bytes) {
                Ok(text) => write!(f, "{}", text)?,
                Err(_) => write!(f, "{:02x?}", bytes)?,
            },
            None => write!(f, "-")?,
        }
        write!(f, ", checksum: 0x{:08X}", self.checksum)
    }
}
