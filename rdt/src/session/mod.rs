//! Session state machine and main API.
//!
//! A `Session` is one endpoint of the transfer. It owns its window, its
//! reassembly buffer, its counters and both channel endpoints. The driver
//! calls [`Session::tick`] repeatedly; each tick runs the send half and
//! then the receive half to completion.
//!
//! # Example
//!
//! ```rust
//! use rdt::channel::{self, UnreliableChannel};
//! use rdt::{Role, SessionBuilder};
//!
//! let data_link = channel::shared(UnreliableChannel::lossless());
//! let ack_link = channel::shared(UnreliableChannel::lossless());
//!
//! let mut sender = SessionBuilder::new()
//!     .role(Role::Sender)
//!     .data("ABCDEFGHIJKLMNOP")
//!     .idle_threshold(0)
//!     .build(data_link.clone(), ack_link.clone())?;
//! let mut receiver = SessionBuilder::new().build(ack_link, data_link)?;
//!
//! sender.tick();
//! let outcome = receiver.tick();
//! assert_eq!(outcome.ack_sent, Some(4));
//! # Ok::<(), rdt::Error>(())
//! ```

mod receiver;
mod sender;
mod stats;

use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::{ReceiveWindowPolicy, Window};
use crate::channel::{Channel, SharedChannel};
use crate::config::Config;
use crate::error::Result;
use crate::reliable::{IdleTimer, Reassembler, ResendPolicy};
use crate::wire::Message;

pub use receiver::{BatchOutcome, ReceiveController};
pub use sender::{ResendPlan, SendController};
pub use stats::SessionStats;

/// What an endpoint does with the data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Transmits its message and consumes ACKs.
    Sender,

    /// Never transmits data; receives, reassembles and acknowledges.
    Receiver,

    /// Transmits its message and receives the peer's over the same window.
    Dual,
}

impl Role {
    /// Returns true if the role transmits data segments.
    pub const fn sends_data(&self) -> bool {
        matches!(self, Role::Sender | Role::Dual)
    }
}

/// Summary of one processing step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Tick number, starting at 1.
    pub tick: u64,

    /// Window slides caused by matching ACKs.
    pub window_advances: u32,

    /// Data segments sent.
    pub segments_sent: usize,

    /// Segments newly admitted to the reassembly buffer.
    pub admitted: usize,

    /// ACK value sent, if any.
    pub ack_sent: Option<u32>,

    /// Whether the idle threshold had been reached.
    pub timed_out: bool,
}

/// One endpoint of the transfer.
pub struct Session<S = SharedChannel, R = SharedChannel> {
    config: Config,
    role: Role,

    /// Derived from the config once, at construction.
    segments_per_window: u32,

    /// Shared by the send filter and the receive filter.
    window: Window,

    sender: SendController,
    receiver: ReceiveController,
    timer: IdleTimer,

    /// Processing steps run so far.
    tick: u64,

    send_channel: S,
    receive_channel: R,

    stats: SessionStats,
}

impl<S: Channel, R: Channel> Session<S, R> {
    /// Creates a session. `data` is ignored for `Role::Receiver`.
    pub fn new(
        config: Config,
        role: Role,
        data: impl Into<Vec<u8>>,
        send_channel: S,
        receive_channel: R,
    ) -> Result<Self> {
        config.validate()?;

        let message = match role {
            Role::Receiver => Message::empty(config.segment_size)?,
            Role::Sender | Role::Dual => Message::new(data, config.segment_size)?,
        };
        let segments_per_window = config.segments_per_window() as u32;

        log::debug!(
            "new {:?} session: {} bytes in {} segments, {} segments per window",
            role,
            message.len(),
            message.fragment_count(),
            segments_per_window
        );

        Ok(Self {
            role,
            segments_per_window,
            window: Window::new(0, segments_per_window),
            sender: SendController::new(message),
            receiver: ReceiveController::new(),
            timer: IdleTimer::new(config.idle_threshold, config.resend_policy),
            tick: 0,
            send_channel,
            receive_channel,
            stats: SessionStats::new(),
            config,
        })
    }

    /// Creates a session that sends `data`.
    pub fn sender(
        config: Config,
        data: impl Into<Vec<u8>>,
        send_channel: S,
        receive_channel: R,
    ) -> Result<Self> {
        Self::new(config, Role::Sender, data, send_channel, receive_channel)
    }

    /// Creates a session that only receives and acknowledges.
    pub fn receiver(config: Config, send_channel: S, receive_channel: R) -> Result<Self> {
        Self::new(config, Role::Receiver, Vec::<u8>::new(), send_channel, receive_channel)
    }

    /// Runs one processing step: the send half, then the receive half.
    pub fn tick(&mut self) -> TickOutcome {
        self.tick += 1;
        let mut outcome = TickOutcome {
            tick: self.tick,
            ..TickOutcome::default()
        };

        let drained = self.process_send(&mut outcome);
        self.process_receive(drained, &mut outcome);

        outcome
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn segments_per_window(&self) -> u32 {
        self.segments_per_window
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// ACK value that slides the window. Always the window's upper bound.
    pub fn expected_ack(&self) -> u32 {
        self.window.high()
    }

    pub fn next_seq_to_send(&self) -> u32 {
        self.sender.next_seq()
    }

    /// The outbound data, empty for a receiver.
    pub fn data_to_send(&self) -> &[u8] {
        self.sender.message().as_bytes()
    }

    /// Returns true once every outbound window has been acknowledged.
    pub fn is_send_complete(&self) -> bool {
        self.sender.is_complete()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn idle_ticks(&self) -> u32 {
        self.timer.idle_ticks()
    }

    pub fn timeout_events(&self) -> u64 {
        self.stats.timeout_events
    }

    /// Sequence units this session has acknowledged as a receiver.
    pub fn acked_units(&self) -> u32 {
        self.receiver.acked_units()
    }

    pub fn reassembler(&self) -> &Reassembler {
        self.receiver.reassembler()
    }

    /// Everything admitted so far, in sequence order.
    pub fn received_data(&self) -> Vec<u8> {
        self.receiver.reassembler().assemble()
    }

    /// `received_data` decoded as UTF-8, with invalid bytes replaced.
    pub fn received_string(&self) -> String {
        String::from_utf8_lossy(&self.received_data()).into_owned()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn send_channel(&self) -> &S {
        &self.send_channel
    }

    pub fn receive_channel(&self) -> &R {
        &self.receive_channel
    }
}

/// Builder for creating sessions with custom configuration.
pub struct SessionBuilder {
    config: Config,
    role: Role,
    data: Vec<u8>,
}

impl SessionBuilder {
    /// Creates a builder for a receiver with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            role: Role::Receiver,
            data: Vec::new(),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the outbound data.
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn segment_size(mut self, size: usize) -> Self {
        self.config = self.config.with_segment_size(size);
        self
    }

    pub fn window_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_window_capacity(capacity);
        self
    }

    pub fn idle_threshold(mut self, ticks: u32) -> Self {
        self.config = self.config.with_idle_threshold(ticks);
        self
    }

    pub fn resend_policy(mut self, policy: ResendPolicy) -> Self {
        self.config = self.config.with_resend_policy(policy);
        self
    }

    pub fn receive_window(mut self, policy: ReceiveWindowPolicy) -> Self {
        self.config = self.config.with_receive_window(policy);
        self
    }

    /// Builds the session over the given channel endpoints.
    pub fn build<S: Channel, R: Channel>(
        self,
        send_channel: S,
        receive_channel: R,
    ) -> Result<Session<S, R>> {
        Session::new(
            self.config,
            self.role,
            self.data,
            send_channel,
            receive_channel,
        )
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::UnreliableChannel;
    use crate::error::Error;
    use crate::wire::Segment;

    type Local = Session<UnreliableChannel, UnreliableChannel>;

    fn local(role: Role, data: &str, config: Config) -> Local {
        Session::new(
            config,
            role,
            data,
            UnreliableChannel::lossless(),
            UnreliableChannel::lossless(),
        )
        .unwrap()
    }

    fn inbound(session: &mut Local) -> &mut UnreliableChannel {
        &mut session.receive_channel
    }

    fn outbound(session: &mut Local) -> &mut UnreliableChannel {
        &mut session.send_channel
    }

    #[test]
    fn test_initial_state() {
        let session = local(Role::Sender, "ABCDEFGHIJKLMNOP", Config::default());
        assert_eq!(session.segments_per_window(), 4);
        assert_eq!(session.window(), Window::new(0, 4));
        assert_eq!(session.expected_ack(), 4);
        assert_eq!(session.next_seq_to_send(), 0);
        assert_eq!(session.tick_count(), 0);
        assert!(session.received_data().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Session::new(
            Config::new().with_segment_size(0),
            Role::Sender,
            "ABCD",
            UnreliableChannel::lossless(),
            UnreliableChannel::lossless(),
        );
        assert_eq!(result.err(), Some(Error::ZeroSegmentSize));
    }

    #[test]
    fn test_timeout_counted_on_sixth_idle_tick() {
        let mut session = local(Role::Receiver, "", Config::default());
        for _ in 0..5 {
            assert!(!session.tick().timed_out);
        }
        assert_eq!(session.timeout_events(), 0);
        assert_eq!(session.idle_ticks(), 5);

        assert!(session.tick().timed_out);
        assert_eq!(session.timeout_events(), 1);
    }

    #[test]
    fn test_sender_silent_until_timeout() {
        let mut session = local(Role::Sender, "ABCDEFGHIJKLMNOP", Config::default());
        for _ in 0..5 {
            assert_eq!(session.tick().segments_sent, 0);
        }
        let outcome = session.tick();
        assert!(outcome.timed_out);
        assert_eq!(outcome.segments_sent, 4);
        assert_eq!(outbound(&mut session).receive().len(), 4);
    }

    #[test]
    fn test_every_idle_tick_resends_after_timeout() {
        let config = Config::default().with_idle_threshold(1);
        let mut session = local(Role::Sender, "ABCDEFGH", config);

        assert_eq!(session.tick().segments_sent, 0);
        assert_eq!(session.tick().segments_sent, 2);
        assert_eq!(session.tick().segments_sent, 2);
        assert_eq!(session.stats().retransmissions, 2);
        assert_eq!(session.timeout_events(), 2);
    }

    #[test]
    fn test_once_per_timeout_rearms() {
        let config = Config::default()
            .with_idle_threshold(1)
            .with_resend_policy(ResendPolicy::OncePerTimeout);
        let mut session = local(Role::Sender, "ABCDEFGH", config);

        let sent: heapless::Vec<usize, 6> = (0..6).map(|_| session.tick().segments_sent).collect();
        assert_eq!(sent.as_slice(), &[0, 2, 0, 2, 0, 2]);
    }

    #[test]
    fn test_ack_advances_and_sends_next_window() {
        let config = Config::default().with_idle_threshold(0);
        let mut session = local(Role::Sender, "ABCDEFGHIJKLMNOPQRSTUVWX", config);

        session.tick();
        outbound(&mut session).receive();

        inbound(&mut session).send(Segment::ack(4));
        let outcome = session.tick();
        assert_eq!(outcome.window_advances, 1);
        assert_eq!(outcome.segments_sent, 2);
        assert_eq!(session.window(), Window::new(4, 4));
        assert_eq!(session.expected_ack(), 8);
        assert_eq!(session.next_seq_to_send(), 4);

        let seqs: heapless::Vec<u32, 4> = outbound(&mut session)
            .receive()
            .iter()
            .map(Segment::sequence)
            .collect();
        assert_eq!(seqs.as_slice(), &[4, 5]);
    }

    #[test]
    fn test_wrong_ack_resends_same_window() {
        let config = Config::default().with_idle_threshold(0);
        let mut session = local(Role::Sender, "ABCDEFGHIJKLMNOP", config);

        inbound(&mut session).send(Segment::ack(3));
        let outcome = session.tick();
        assert_eq!(outcome.window_advances, 0);
        assert_eq!(outcome.segments_sent, 4);
        assert_eq!(session.expected_ack(), 4);
        assert_eq!(session.stats().acks_received, 1);
    }

    #[test]
    fn test_inbound_traffic_resets_idle_count() {
        let mut session = local(Role::Receiver, "", Config::default());
        for _ in 0..4 {
            session.tick();
        }
        assert_eq!(session.idle_ticks(), 4);

        inbound(&mut session).send(Segment::data(0, "ABCD"));
        session.tick();
        assert_eq!(session.idle_ticks(), 0);
        assert_eq!(session.received_string(), "ABCD");
    }

    #[test]
    fn test_receiver_never_sends_data() {
        let config = Config::default().with_idle_threshold(0);
        let mut session = local(Role::Receiver, "ABCD", config);
        for _ in 0..10 {
            assert_eq!(session.tick().segments_sent, 0);
        }
        assert!(session.data_to_send().is_empty());
        assert!(!outbound(&mut session).has_pending());
    }

    #[test]
    fn test_full_window_acknowledged() {
        let mut session = local(Role::Receiver, "", Config::default());
        for (seq, chunk) in ["ABCD", "EFGH", "IJKL", "MNOP"].iter().enumerate() {
            inbound(&mut session).send(Segment::data(seq as u32, *chunk));
        }

        let outcome = session.tick();
        assert_eq!(outcome.ack_sent, Some(4));
        assert_eq!(outcome.admitted, 4);
        assert_eq!(session.acked_units(), 4);
        assert_eq!(outbound(&mut session).receive(), [Segment::ack(4)]);
    }

    #[test]
    fn test_partial_window_not_acknowledged() {
        let mut session = local(Role::Receiver, "", Config::default());
        inbound(&mut session).send(Segment::data(0, "ABCD"));
        inbound(&mut session).send(Segment::data(1, "EFGH"));
        inbound(&mut session).send(Segment::data(2, "IJKL"));

        let outcome = session.tick();
        assert_eq!(outcome.ack_sent, None);
        assert_eq!(session.stats().acks_sent, 0);
        assert_eq!(session.received_string(), "ABCDEFGHIJKL");
    }

    #[test]
    fn test_window_split_across_ticks_not_acknowledged() {
        let mut session = local(Role::Receiver, "", Config::default());
        inbound(&mut session).send(Segment::data(0, "ABCD"));
        inbound(&mut session).send(Segment::data(1, "EFGH"));
        session.tick();
        inbound(&mut session).send(Segment::data(2, "IJKL"));
        inbound(&mut session).send(Segment::data(3, "MNOP"));
        let outcome = session.tick();

        assert_eq!(outcome.ack_sent, None);
        assert_eq!(session.received_string(), "ABCDEFGHIJKLMNOP");
    }

    #[test]
    fn test_fixed_receiver_window_never_moves() {
        let mut session = local(Role::Receiver, "", Config::default());
        for seq in 0..4u32 {
            inbound(&mut session).send(Segment::data(seq, "ABCD"));
        }
        session.tick();
        assert_eq!(session.window(), Window::new(0, 4));

        // The next window only overlaps the fixed one at its upper bound.
        for seq in 4..8u32 {
            inbound(&mut session).send(Segment::data(seq, "EFGH"));
        }
        let outcome = session.tick();
        assert_eq!(outcome.admitted, 1);
        assert_eq!(outcome.ack_sent, None);
        assert_eq!(session.stats().out_of_window, 3);
        assert_eq!(session.window(), Window::new(0, 4));
    }

    #[test]
    fn test_tracking_receiver_slides_and_reacks() {
        let config = Config::default().with_receive_window(ReceiveWindowPolicy::Tracking);
        let mut session = local(Role::Receiver, "", config);
        for seq in 0..4u32 {
            inbound(&mut session).send(Segment::data(seq, "ABCD"));
        }
        assert_eq!(session.tick().ack_sent, Some(4));
        assert_eq!(session.window(), Window::new(4, 4));

        // Same window again: the ACK was lost, acknowledge it once more.
        for seq in 0..4u32 {
            inbound(&mut session).send(Segment::data(seq, "ABCD"));
        }
        assert_eq!(session.tick().ack_sent, Some(4));
        assert_eq!(session.window(), Window::new(4, 4));
        assert_eq!(session.acked_units(), 4);
        assert_eq!(session.stats().acks_sent, 2);
    }

    #[test]
    fn test_dual_keeps_peer_data_drained_with_acks() {
        let config = Config::default().with_idle_threshold(0);
        let mut session = local(Role::Dual, "WXYZ", config);

        inbound(&mut session).send(Segment::data(0, "ABCD"));
        inbound(&mut session).send(Segment::ack(9));
        let outcome = session.tick();

        assert_eq!(outcome.segments_sent, 1);
        assert_eq!(outcome.admitted, 1);
        assert_eq!(session.received_string(), "ABCD");
    }
}
