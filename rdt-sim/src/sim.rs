//! Drives a sender and a receiver session over two faulty channels.

use rdt::channel::{self, ChannelStats, SharedChannel, UnreliableChannel};
use rdt::{ChannelConfig, Config, Session, SessionStats};

/// Everything needed to run one transfer.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub message: String,
    pub config: Config,
    pub data_channel: ChannelConfig,
    pub ack_channel: ChannelConfig,
    pub max_ticks: u64,
}

/// What happened during a run.
#[derive(Debug, Clone)]
pub struct Report {
    pub completed: bool,
    pub ticks: u64,
    pub received: String,
    pub sender: SessionStats,
    pub receiver: SessionStats,
    pub data_channel: ChannelStats,
    pub ack_channel: ChannelStats,
}

impl Report {
    pub fn log(&self) {
        log::info!("=== Transfer {} ===", if self.completed { "Complete" } else { "Incomplete" });
        log::info!("Ticks: {}", self.ticks);
        log::info!("Received: {:?}", self.received);
        log::info!(
            "Sender: {} data segments sent, {} retransmitted ({:.1}%), {} acks received, {} window advances, {} timeouts",
            self.sender.data_segments_sent,
            self.sender.retransmissions,
            self.sender.retransmit_rate(),
            self.sender.acks_received,
            self.sender.window_advances,
            self.sender.timeout_events
        );
        log::info!(
            "Receiver: {} admitted, {} acks sent, {} checksum failures, {} duplicates, {} out of window",
            self.receiver.segments_admitted,
            self.receiver.acks_sent,
            self.receiver.checksum_failures,
            self.receiver.duplicates,
            self.receiver.out_of_window
        );
        log_channel("Data channel", &self.data_channel);
        log_channel("Ack channel", &self.ack_channel);
    }
}

fn log_channel(name: &str, stats: &ChannelStats) {
    log::info!(
        "{}: {} offered, {} delivered, {} dropped, {} corrupted, {} duplicated, {} reordered, {} delayed",
        name,
        stats.offered,
        stats.delivered,
        stats.dropped,
        stats.corrupted,
        stats.duplicated,
        stats.reordered,
        stats.delayed
    );
}

/// Runs the scenario until the receiver holds the whole message or the
/// tick limit is reached.
pub fn run(scenario: &Scenario) -> rdt::Result<Report> {
    let data: SharedChannel = channel::shared(UnreliableChannel::new(scenario.data_channel)?);
    let acks: SharedChannel = channel::shared(UnreliableChannel::new(scenario.ack_channel)?);

    let mut sender = Session::sender(
        scenario.config,
        scenario.message.as_bytes(),
        data.clone(),
        acks.clone(),
    )?;
    let mut receiver = Session::receiver(scenario.config, acks.clone(), data.clone())?;

    let expected = scenario.message.as_bytes();
    let mut completed = expected.is_empty();
    let mut ticks = 0;

    while !completed && ticks < scenario.max_ticks {
        ticks += 1;
        let sent = sender.tick();
        let received = receiver.tick();
        if sent.window_advances > 0 || received.ack_sent.is_some() {
            log::debug!(
                "tick {}: sender window [{}, {}], receiver acked {} units",
                ticks,
                sender.window().low(),
                sender.window().high(),
                receiver.acked_units()
            );
        }
        completed = receiver.received_data() == expected;
    }

    let report = Report {
        completed,
        ticks,
        received: receiver.received_string(),
        sender: *sender.stats(),
        receiver: *receiver.stats(),
        data_channel: *data.borrow().stats(),
        ack_channel: *acks.borrow().stats(),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdt::ReceiveWindowPolicy;

    fn scenario(message: &str, config: Config, channel: ChannelConfig) -> Scenario {
        Scenario {
            message: message.to_string(),
            config,
            data_channel: channel,
            ack_channel: channel.with_seed(channel.seed.wrapping_add(1)),
            max_ticks: 2_000,
        }
    }

    #[test]
    fn test_lossless_single_window() {
        let report = run(&scenario(
            "ABCDEFGHIJKLMNOP",
            Config::default(),
            ChannelConfig::lossless(),
        ))
        .unwrap();

        assert!(report.completed);
        assert_eq!(report.ticks, 6);
        assert_eq!(report.received, "ABCDEFGHIJKLMNOP");
        assert_eq!(report.receiver.acks_sent, 1);
        assert_eq!(report.data_channel.offered, 4);
    }

    #[test]
    fn test_empty_message_completes_immediately() {
        let report = run(&scenario("", Config::default(), ChannelConfig::lossless())).unwrap();
        assert!(report.completed);
        assert_eq!(report.ticks, 0);
    }

    #[test]
    fn test_lossy_tracking_completes() {
        let config = Config::default().with_receive_window(ReceiveWindowPolicy::Tracking);
        let channel = ChannelConfig::lossless()
            .with_drop_rate(0.15)
            .with_duplicate_rate(0.1)
            .with_reorder_rate(0.1)
            .with_seed(42);
        let report = run(&scenario("ABCDEFGHIJKLMNOPQRSTUVWXYZ012345", config, channel)).unwrap();

        assert!(report.completed);
        assert_eq!(report.received, "ABCDEFGHIJKLMNOPQRSTUVWXYZ012345");
    }

    #[test]
    fn test_tick_limit_reported_as_incomplete() {
        let mut stalled = scenario(
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ012345",
            Config::default(),
            ChannelConfig::lossless(),
        );
        stalled.max_ticks = 50;
        let report = run(&stalled).unwrap();

        assert!(!report.completed);
        assert_eq!(report.ticks, 50);
    }

    #[test]
    fn test_invalid_channel_rejected() {
        let bad = ChannelConfig::lossless().with_drop_rate(1.5);
        let result = run(&scenario("ABCD", Config::default(), bad));
        assert!(matches!(result, Err(rdt::Error::InvalidProbability { .. })));
    }
}
