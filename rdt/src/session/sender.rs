//! Send path of a session.
//!
//! The sender keeps exactly one window of segments outstanding. The window
//! only slides when an ACK equal to the window's upper bound arrives; every
//! tick that reaches the send step re-sends the whole current window.
//! There is no per-segment retransmission.

use alloc::vec::Vec;

use super::{Session, TickOutcome};
use crate::buffer::Window;
use crate::channel::Channel;
use crate::reliable::IdleVerdict;
use crate::wire::{Message, Segment};
use crate::MAX_SEGMENTS_PER_WINDOW;

/// Sequence numbers scheduled for (re)transmission on one tick.
pub type ResendPlan = heapless::Vec<u32, MAX_SEGMENTS_PER_WINDOW>;

/// Outbound state: the fragmented message and the next index to send.
#[derive(Debug)]
pub struct SendController {
    message: Message,

    /// First sequence number of the current window.
    next_seq: u32,

    /// Highest sequence number transmitted so far.
    highest_sent: Option<u32>,
}

impl SendController {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            next_seq: 0,
            highest_sent: None,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub const fn next_seq(&self) -> u32 {
        self.next_seq
    }

    /// Returns true once every fragment lies below the window.
    pub fn is_complete(&self) -> bool {
        self.next_seq as usize >= self.message.fragment_count()
    }

    /// Applies the ACKs found in a drained batch.
    ///
    /// Each segment whose ACK number equals the window's upper bound slides
    /// the window by `spw`; several matching ACKs in one batch each slide it
    /// again. Returns the number of slides.
    pub fn on_acks(&mut self, batch: &[Segment], window: &mut Window, spw: u32) -> u32 {
        let mut advances = 0;
        for ack in batch.iter().filter_map(Segment::ack_number) {
            if ack != window.high() {
                log::trace!("ignoring ack {}, expecting {}", ack, window.high());
                continue;
            }
            self.next_seq = self.next_seq.saturating_add(spw);
            window.slide(spw);
            advances += 1;
            log::debug!(
                "ack {} matched, window now [{}, {}]",
                ack,
                window.low(),
                window.high()
            );
        }
        advances
    }

    /// Sequence numbers of the current window that exist in the message.
    pub fn resend_plan(&self, spw: u32) -> ResendPlan {
        let mut plan = ResendPlan::new();
        let fragments = self.message.fragment_count();
        let end = self.next_seq.saturating_add(spw);
        for seq in self.next_seq..end {
            if seq as usize >= fragments {
                break;
            }
            // Capacity is guaranteed by Config::validate.
            let _ = plan.push(seq);
        }
        plan
    }

    /// Records a transmission. Returns true if `seq` had been sent before.
    pub fn mark_sent(&mut self, seq: u32) -> bool {
        match self.highest_sent {
            Some(highest) if seq <= highest => true,
            _ => {
                self.highest_sent = Some(seq);
                false
            }
        }
    }
}

impl<S: Channel, R: Channel> Session<S, R> {
    /// Send half of a tick.
    ///
    /// Returns the segments drained while looking for ACKs so the receive
    /// half can process them in the same tick.
    pub(super) fn process_send(&mut self, outcome: &mut TickOutcome) -> Vec<Segment> {
        let mut drained = Vec::new();

        if self.receive_channel.has_pending() {
            self.timer.on_activity();
            if self.role.sends_data() {
                drained = self.receive_channel.receive();
                self.apply_acks(&drained, outcome);
            }
        } else {
            match self.timer.on_idle() {
                IdleVerdict::Waiting => return drained,
                IdleVerdict::TimedOut => {
                    self.stats.timeout_events += 1;
                    outcome.timed_out = true;
                    log::debug!(
                        "tick {}: no inbound traffic for {} ticks, timeout #{}",
                        self.tick,
                        self.timer.threshold(),
                        self.stats.timeout_events
                    );
                }
            }
        }

        if self.role.sends_data() {
            outcome.segments_sent = self.send_window();
        }
        drained
    }

    /// Feeds the ACKs in `batch` to the send controller.
    pub(super) fn apply_acks(&mut self, batch: &[Segment], outcome: &mut TickOutcome) {
        let acks = batch.iter().filter(|s| s.ack_number().is_some()).count();
        if acks == 0 {
            return;
        }
        self.stats.acks_received += acks as u64;

        let advances = self
            .sender
            .on_acks(batch, &mut self.window, self.segments_per_window);
        self.stats.window_advances += u64::from(advances);
        outcome.window_advances += advances;
    }

    fn send_window(&mut self) -> usize {
        let plan = self.sender.resend_plan(self.segments_per_window);
        let mut sent = 0;
        for &seq in plan.iter() {
            let Some(segment) = self.sender.message().segment(seq) else {
                continue;
            };
            if self.sender.mark_sent(seq) {
                self.stats.retransmissions += 1;
            }
            log::trace!("tick {}: sending {}", self.tick, segment);
            self.send_channel.send(segment);
            self.stats.data_segments_sent += 1;
            sent += 1;
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn controller(data: &str) -> SendController {
        SendController::new(Message::new(data, 4).unwrap())
    }

    #[test]
    fn test_resend_plan_full_window() {
        let sender = controller("ABCDEFGHIJKLMNOPQRST");
        assert_eq!(sender.resend_plan(4).as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_resend_plan_clipped_to_data() {
        let mut sender = controller("ABCDEFGHIJKLMNOPQRST");
        let mut window = Window::new(0, 4);
        sender.on_acks(&[Segment::ack(4)], &mut window, 4);
        assert_eq!(sender.resend_plan(4).as_slice(), &[4]);

        sender.on_acks(&[Segment::ack(8)], &mut window, 4);
        assert!(sender.resend_plan(4).is_empty());
        assert!(sender.is_complete());
    }

    #[test]
    fn test_matching_ack_advances() {
        let mut sender = controller("ABCDEFGHIJKLMNOP");
        let mut window = Window::new(0, 4);

        assert_eq!(sender.on_acks(&[Segment::ack(4)], &mut window, 4), 1);
        assert_eq!(sender.next_seq(), 4);
        assert_eq!((window.low(), window.high()), (4, 8));
    }

    #[test]
    fn test_mismatched_ack_ignored() {
        let mut sender = controller("ABCDEFGHIJKLMNOP");
        let mut window = Window::new(0, 4);

        let batch = vec![Segment::ack(3), Segment::ack(8), Segment::data(0, "ABCD")];
        assert_eq!(sender.on_acks(&batch, &mut window, 4), 0);
        assert_eq!(sender.next_seq(), 0);
        assert_eq!(window, Window::new(0, 4));
    }

    #[test]
    fn test_each_matching_ack_in_batch_advances() {
        let mut sender = controller("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let mut window = Window::new(0, 4);

        // 4 matches, then 8 matches the slid window; the repeated 4 does not.
        let batch = vec![Segment::ack(4), Segment::ack(4), Segment::ack(8)];
        assert_eq!(sender.on_acks(&batch, &mut window, 4), 2);
        assert_eq!(sender.next_seq(), 8);
        assert_eq!(window.high(), 12);
    }

    #[test]
    fn test_mark_sent_tracks_retransmissions() {
        let mut sender = controller("ABCDEFGH");
        assert!(!sender.mark_sent(0));
        assert!(!sender.mark_sent(1));
        assert!(sender.mark_sent(0));
        assert!(sender.mark_sent(1));
    }
}
