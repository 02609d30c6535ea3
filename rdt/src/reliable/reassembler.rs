//! Reassembly of admitted segments.
//!
//! Segments may be admitted in any order. They are keyed by sequence
//! number, which rejects duplicates on insertion and yields the payloads
//! in stream order when read back. Nothing is ever evicted.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Receive-side buffer of `(sequence, payload)` pairs.
#[derive(Debug, Default, Clone)]
pub struct Reassembler {
    segments: BTreeMap<u32, Vec<u8>>,

    /// Total payload bytes held.
    bytes: usize,
}

impl Reassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a payload at `sequence`.
    ///
    /// Returns false, leaving the buffer untouched, if that sequence
    /// number is already present.
    pub fn admit(&mut self, sequence: u32, payload: &[u8]) -> bool {
        if self.segments.contains_key(&sequence) {
            return false;
        }
        self.bytes += payload.len();
        self.segments.insert(sequence, payload.to_vec());
        true
    }

    pub fn contains(&self, sequence: u32) -> bool {
        self.segments.contains_key(&sequence)
    }

    /// Number of buffered segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Payload bytes buffered so far.
    pub fn bytes_buffered(&self) -> usize {
        self.bytes
    }

    /// Length of the gap-free run of sequence numbers starting at 0.
    pub fn contiguous(&self) -> u32 {
        let mut next = 0;
        for &sequence in self.segments.keys() {
            if sequence != next {
                break;
            }
            next += 1;
        }
        next
    }

    /// Buffered pairs in ascending sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u8])> + '_ {
        self.segments
            .iter()
            .map(|(&sequence, payload)| (sequence, payload.as_slice()))
    }

    /// Concatenates every buffered payload in sequence order.
    ///
    /// Gaps are skipped, so a partial transfer yields a partial stream.
    pub fn assemble(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes);
        for payload in self.segments.values() {
            out.extend_from_slice(payload);
        }
        out
    }
}
