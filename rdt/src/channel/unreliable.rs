//! In-memory channel with a reproducible fault model.
//!
//! | Fault       | Effect                                                 |
//! |-------------|--------------------------------------------------------|
//! | Drop        | The segment is never delivered.                        |
//! | Corrupt     | One payload bit is flipped after the checksum was set. |
//! | Duplicate   | The segment is delivered twice.                        |
//! | Reorder     | The segment overtakes some already queued segments.    |
//! | Delay       | The segment is held back for a few drains.             |
//!
//! All decisions come from a `StdRng` seeded by `ChannelConfig::seed`, so a
//! given configuration always produces the same run.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Channel;
use crate::error::{Error, Result};
use crate::wire::Segment;

/// Fault probabilities for an `UnreliableChannel`.
///
/// All rates are probabilities in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Probability that a segment is silently dropped.
    pub drop_rate: f64,

    /// Probability that a data segment's payload is corrupted.
    pub corrupt_rate: f64,

    /// Probability that a segment is delivered twice.
    pub duplicate_rate: f64,

    /// Probability that a segment jumps ahead of queued segments.
    pub reorder_rate: f64,

    /// Probability that a segment is held back.
    pub delay_rate: f64,

    /// Maximum number of drains a delayed segment is held back for.
    pub max_delay: u32,

    /// RNG seed.
    pub seed: u64,
}

impl ChannelConfig {
    /// A channel that delivers everything, once, in order.
    pub const fn lossless() -> Self {
        Self {
            drop_rate: 0.0,
            corrupt_rate: 0.0,
            duplicate_rate: 0.0,
            reorder_rate: 0.0,
            delay_rate: 0.0,
            max_delay: 0,
            seed: 0,
        }
    }

    pub fn with_drop_rate(mut self, rate: f64) -> Self {
        self.drop_rate = rate;
        self
    }

    pub fn with_corrupt_rate(mut self, rate: f64) -> Self {
        self.corrupt_rate = rate;
        self
    }

    pub fn with_duplicate_rate(mut self, rate: f64) -> Self {
        self.duplicate_rate = rate;
        self
    }

    pub fn with_reorder_rate(mut self, rate: f64) -> Self {
        self.reorder_rate = rate;
        self
    }

    /// Holds segments back for `1..=max_delay` drains with probability `rate`.
    pub fn with_delay(mut self, rate: f64, max_delay: u32) -> Self {
        self.delay_rate = rate;
        self.max_delay = max_delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let rates = [
            ("drop_rate", self.drop_rate),
            ("corrupt_rate", self.corrupt_rate),
            ("duplicate_rate", self.duplicate_rate),
            ("reorder_rate", self.reorder_rate),
            ("delay_rate", self.delay_rate),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::InvalidProbability { name });
            }
        }
        if self.delay_rate > 0.0 && self.max_delay == 0 {
            return Err(Error::ZeroMaxDelay);
        }
        Ok(())
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::lossless()
    }
}

/// Counters describing what the channel did to the traffic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// Segments handed to `send`.
    pub offered: u64,

    /// Offered segments carrying data.
    pub data_segments: u64,

    /// Offered ACK-only segments.
    pub ack_segments: u64,

    /// Segments returned by `receive`.
    pub delivered: u64,

    pub dropped: u64,
    pub corrupted: u64,
    pub duplicated: u64,
    pub reordered: u64,
    pub delayed: u64,
}

/// A unidirectional queue that misbehaves according to its `ChannelConfig`.
#[derive(Debug)]
pub struct UnreliableChannel {
    config: ChannelConfig,
    rng: StdRng,

    /// Segments deliverable on the next drain.
    ready: VecDeque<Segment>,

    /// Held-back segments and the number of drains they still skip.
    delayed: Vec<(u32, Segment)>,

    stats: ChannelStats,
}

impl UnreliableChannel {
    pub fn new(config: ChannelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            ready: VecDeque::new(),
            delayed: Vec::new(),
            stats: ChannelStats::default(),
        })
    }

    /// A channel that never misbehaves.
    pub fn lossless() -> Self {
        Self {
            config: ChannelConfig::lossless(),
            rng: StdRng::seed_from_u64(0),
            ready: VecDeque::new(),
            delayed: Vec::new(),
            stats: ChannelStats::default(),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Segments currently held back by a delay.
    pub fn delayed_count(&self) -> usize {
        self.delayed.len()
    }

    fn enqueue(&mut self, segment: Segment) {
        if self.config.max_delay > 0 && self.rng.random_bool(self.config.delay_rate) {
            let drains = self.rng.random_range(1..=self.config.max_delay);
            log::trace!("channel delayed segment for {} drains: {}", drains, segment);
            self.stats.delayed += 1;
            self.delayed.push((drains, segment));
            return;
        }

        if !self.ready.is_empty() && self.rng.random_bool(self.config.reorder_rate) {
            let position = self.rng.random_range(0..self.ready.len());
            log::trace!("channel reordered segment to slot {}: {}", position, segment);
            self.stats.reordered += 1;
            self.ready.insert(position, segment);
            return;
        }

        self.ready.push_back(segment);
    }

    /// Moves held-back segments whose delay ran out into the ready queue.
    fn release_delayed(&mut self) {
        let mut index = 0;
        while index < self.delayed.len() {
            if self.delayed[index].0 == 0 {
                let (_, segment) = self.delayed.remove(index);
                self.ready.push_back(segment);
            } else {
                self.delayed[index].0 -= 1;
                index += 1;
            }
        }
    }
}

impl Channel for UnreliableChannel {
    fn send(&mut self, mut segment: Segment) {
        self.stats.offered += 1;
        if segment.is_data() {
            self.stats.data_segments += 1;
        } else {
            self.stats.ack_segments += 1;
        }

        if self.rng.random_bool(self.config.drop_rate) {
            log::trace!("channel dropped segment: {}", segment);
            self.stats.dropped += 1;
            return;
        }

        let payload_len = segment.payload().map_or(0, <[u8]>::len);
        if payload_len > 0 && self.rng.random_bool(self.config.corrupt_rate) {
            let index = self.rng.random_range(0..payload_len);
            let bit = self.rng.random_range(0..8u8);
            segment.corrupt_payload(index, bit);
            log::trace!("channel corrupted segment: {}", segment);
            self.stats.corrupted += 1;
        }

        if self.rng.random_bool(self.config.duplicate_rate) {
            log::trace!("channel duplicated segment: {}", segment);
            self.stats.duplicated += 1;
            self.enqueue(segment.clone());
        }
        self.enqueue(segment);
    }

    fn receive(&mut self) -> Vec<Segment> {
        self.release_delayed();
        let segments: Vec<Segment> = self.ready.drain(..).collect();
        self.stats.delivered += segments.len() as u64;
        segments
    }

    fn has_pending(&self) -> bool {
        !self.ready.is_empty()
    }
}
