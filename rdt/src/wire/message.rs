//! Outbound message and its fragmentation.
//!
//! The message is split into `segment_size` byte fragments. Fragment `i`
//! travels as the data segment with sequence number `i`; the last fragment
//! may be shorter than the others.

use alloc::vec::Vec;

use super::segment::Segment;
use crate::error::{Error, Result};

/// Data supplied once by the application for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    data: Vec<u8>,
    segment_size: usize,
}

impl Message {
    /// Creates a message fragmented into `segment_size` byte pieces.
    pub fn new(data: impl Into<Vec<u8>>, segment_size: usize) -> Result<Self> {
        if segment_size == 0 {
            return Err(Error::ZeroSegmentSize);
        }
        Ok(Self {
            data: data.into(),
            segment_size,
        })
    }

    /// An empty message, as held by a pure receiver.
    pub fn empty(segment_size: usize) -> Result<Self> {
        Self::new(Vec::new(), segment_size)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn segment_size(&self) -> usize {
        self.segment_size
    }

    /// Number of fragments; zero for an empty message.
    pub fn fragment_count(&self) -> usize {
        self.data.len().div_ceil(self.segment_size)
    }

    /// Payload of fragment `index`, or `None` past the end of the data.
    pub fn fragment(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.segment_size)?;
        if start >= self.data.len() {
            return None;
        }
        let end = core::cmp::min(start + self.segment_size, self.data.len());
        Some(&self.data[start..end])
    }

    /// Builds the data segment for sequence number `sequence`.
    pub fn segment(&self, sequence: u32) -> Option<Segment> {
        self.fragment(sequence as usize)
            .map(|payload| Segment::data(sequence, payload))
    }
}
