//! Receive path of a session.
//!
//! Every tick drains the inbound channel and filters the batch. A data
//! segment is accepted when its checksum holds, it is not a repeat within
//! the batch, and its sequence number lies in the current window. Accepted
//! segments go to the reassembler unless already buffered. When a batch
//! holds exactly one window's worth of accepted segments, a cumulative ACK
//! for `window.low + spw` goes back to the peer.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use super::{Role, Session, SessionStats, TickOutcome};
use crate::buffer::{ReceiveWindowPolicy, Window};
use crate::channel::Channel;
use crate::reliable::Reassembler;
use crate::wire::Segment;

/// Result of filtering one drained batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Distinct valid in-window segments in the batch.
    pub accepted: usize,

    /// Accepted segments that were new to the reassembler.
    pub admitted: usize,

    /// Distinct valid segments belonging to the preceding window.
    pub preceding: usize,
}

/// Inbound state: the reassembly buffer and the cumulative ACK counter.
#[derive(Debug, Default)]
pub struct ReceiveController {
    reassembler: Reassembler,

    /// Sequence units acknowledged so far.
    acked_units: u32,
}

impl ReceiveController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reassembler(&self) -> &Reassembler {
        &self.reassembler
    }

    pub const fn acked_units(&self) -> u32 {
        self.acked_units
    }

    /// Filters `batch` against `window` and admits what passes.
    ///
    /// `preceding` is only given when retransmissions of the previous
    /// window should be counted for a re-acknowledgment.
    pub fn accept_batch(
        &mut self,
        batch: &[Segment],
        window: &Window,
        preceding: Option<Window>,
        stats: &mut SessionStats,
    ) -> BatchOutcome {
        let mut accepted: BTreeMap<u32, &[u8]> = BTreeMap::new();
        let mut stale: BTreeSet<u32> = BTreeSet::new();

        for segment in batch {
            let Some(payload) = segment.payload() else {
                continue;
            };
            let seq = segment.sequence();
            if !segment.check_checksum() {
                log::trace!("dropping corrupted segment: {}", segment);
                stats.checksum_failures += 1;
                continue;
            }
            if accepted.contains_key(&seq) {
                stats.duplicates += 1;
                continue;
            }
            if !window.contains(seq) {
                if preceding.is_some_and(|w| w.contains(seq)) {
                    stale.insert(seq);
                }
                log::trace!(
                    "dropping segment {} outside window [{}, {}]",
                    seq,
                    window.low(),
                    window.high()
                );
                stats.out_of_window += 1;
                continue;
            }
            accepted.insert(seq, payload);
        }

        let mut admitted = 0;
        for (&seq, payload) in &accepted {
            if self.reassembler.admit(seq, payload) {
                admitted += 1;
            } else {
                stats.duplicates += 1;
            }
        }
        stats.segments_admitted += admitted as u64;

        BatchOutcome {
            accepted: accepted.len(),
            admitted,
            preceding: stale.len(),
        }
    }

    /// Builds the cumulative ACK for a fully received window.
    pub fn acknowledge(&mut self, window: &Window, spw: u32) -> Segment {
        self.acked_units = self.acked_units.saturating_add(spw);
        Segment::ack(window.low().saturating_add(spw))
    }
}

impl<S: Channel, R: Channel> Session<S, R> {
    /// Receive half of a tick, processing `drained` first.
    pub(super) fn process_receive(&mut self, mut drained: Vec<Segment>, outcome: &mut TickOutcome) {
        // Receivers drain everything here. Senders pick up late releases here.
        let late = self.receive_channel.receive();
        if !late.is_empty() {
            self.timer.on_activity();
            if self.role.sends_data() {
                self.apply_acks(&late, outcome);
            }
            drained.extend(late);
        }
        if drained.is_empty() {
            return;
        }

        let spw = self.segments_per_window;
        let tracking = self.role == Role::Receiver
            && self.config.receive_window == ReceiveWindowPolicy::Tracking;
        let preceding = if tracking { self.window.preceding() } else { None };

        let batch = self
            .receiver
            .accept_batch(&drained, &self.window, preceding, &mut self.stats);
        outcome.admitted = batch.admitted;

        if batch.accepted == spw as usize {
            let ack = self.receiver.acknowledge(&self.window, spw);
            self.send_ack(ack, outcome);
            if tracking {
                self.window.slide(spw);
            }
        } else if tracking && batch.preceding == spw as usize {
            // The peer missed our last ACK and resent the whole window.
            self.send_ack(Segment::ack(self.window.low()), outcome);
        }
    }

    fn send_ack(&mut self, ack: Segment, outcome: &mut TickOutcome) {
        log::debug!("tick {}: sending {}", self.tick, ack);
        outcome.ack_sent = ack.ack_number();
        self.send_channel.send(ack);
        self.stats.acks_sent += 1;
    }
}
