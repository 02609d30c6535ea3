//! Sliding window bounds.
//!
//! Bounds are expressed in sequence-index units and are inclusive at both
//! ends, so a window `[0, 4]` admits sequence numbers 0 through 4. The
//! span `high - low` never changes once the window is created.

/// How a receiving session treats its own window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiveWindowPolicy {
    /// The window only moves when the send path sees a matching ACK.
    /// A pure receiver therefore keeps its initial window for the whole run.
    #[default]
    Fixed,

    /// A pure receiver slides its window every time it emits an ACK and
    /// re-acknowledges a full retransmission of the previous window.
    Tracking,
}

/// Inclusive `[low, high]` window over sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    low: u32,
    high: u32,
}

impl Window {
    /// Creates the window `[low, low + span]`.
    pub const fn new(low: u32, span: u32) -> Self {
        Self {
            low,
            high: low.saturating_add(span),
        }
    }

    pub const fn low(&self) -> u32 {
        self.low
    }

    pub const fn high(&self) -> u32 {
        self.high
    }

    pub const fn span(&self) -> u32 {
        self.high - self.low
    }

    /// Returns true if `seq` lies within `[low, high]`.
    pub const fn contains(&self, seq: u32) -> bool {
        self.low <= seq && seq <= self.high
    }

    /// Moves both bounds forward by `by`.
    pub fn slide(&mut self, by: u32) {
        self.low = self.low.saturating_add(by);
        self.high = self.high.saturating_add(by);
    }

    /// The window of the same span that ended where this one starts.
    ///
    /// Returns `None` while this is the first window.
    pub const fn preceding(&self) -> Option<Window> {
        let span = self.span();
        if self.low < span {
            return None;
        }
        Some(Window::new(self.low - span, span))
    }
}
