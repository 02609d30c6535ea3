//! Entry point for `rdt-sim`.
//!
//! Parses CLI arguments, builds a scenario and runs a sender and a receiver
//! session against each other over simulated unreliable channels. Set
//! `RUST_LOG=debug` (or `trace`) to follow the protocol tick by tick.

mod sim;

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rdt::{ChannelConfig, Config, ReceiveWindowPolicy, ResendPolicy};

use crate::sim::Scenario;

/// Windowed reliable data transfer over a simulated lossy channel.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Text to transfer from the sender to the receiver.
    #[arg(short, long, default_value = "The quick brown fox jumps over the lazy dog")]
    message: String,

    /// Bytes carried by one segment.
    #[arg(long, default_value_t = rdt::DEFAULT_SEGMENT_SIZE)]
    segment_size: usize,

    /// Bytes the window may hold.
    #[arg(long, default_value_t = rdt::DEFAULT_WINDOW_CAPACITY)]
    window_capacity: usize,

    /// Idle ticks tolerated before the sender resends its window.
    #[arg(long, default_value_t = rdt::DEFAULT_IDLE_THRESHOLD)]
    idle_threshold: u32,

    /// Give up after this many ticks.
    #[arg(short = 't', long, default_value_t = 1000)]
    max_ticks: u64,

    /// Probability that a segment is dropped.
    #[arg(long, default_value_t = 0.0)]
    drop: f64,

    /// Probability that a data segment is corrupted.
    #[arg(long, default_value_t = 0.0)]
    corrupt: f64,

    /// Probability that a segment is duplicated.
    #[arg(long, default_value_t = 0.0)]
    duplicate: f64,

    /// Probability that a segment overtakes queued segments.
    #[arg(long, default_value_t = 0.0)]
    reorder: f64,

    /// Probability that a segment is held back.
    #[arg(long, default_value_t = 0.0)]
    delay: f64,

    /// Maximum number of drains a delayed segment is held back for.
    #[arg(long, default_value_t = 3)]
    max_delay: u32,

    /// Seed for the data channel; the ACK channel uses the next value.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// How the receiver's window behaves after an acknowledgment.
    #[arg(long, value_enum, default_value_t = WindowMode::Tracking)]
    receive_window: WindowMode,

    /// When the sender resends after the idle threshold.
    #[arg(long, value_enum, default_value_t = ResendMode::EveryTick)]
    resend: ResendMode,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WindowMode {
    /// The receiver window never moves.
    Fixed,
    /// The receiver window follows its own acknowledgments.
    Tracking,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ResendMode {
    /// Resend on every idle tick once the threshold is reached.
    EveryTick,
    /// Resend once, then wait for the threshold again.
    Once,
}

impl Cli {
    fn scenario(&self) -> Scenario {
        let receive_window = match self.receive_window {
            WindowMode::Fixed => ReceiveWindowPolicy::Fixed,
            WindowMode::Tracking => ReceiveWindowPolicy::Tracking,
        };
        let resend_policy = match self.resend {
            ResendMode::EveryTick => ResendPolicy::EveryTickAfterTimeout,
            ResendMode::Once => ResendPolicy::OncePerTimeout,
        };
        let config = Config::default()
            .with_segment_size(self.segment_size)
            .with_window_capacity(self.window_capacity)
            .with_idle_threshold(self.idle_threshold)
            .with_receive_window(receive_window)
            .with_resend_policy(resend_policy);

        let channel = ChannelConfig::lossless()
            .with_drop_rate(self.drop)
            .with_corrupt_rate(self.corrupt)
            .with_duplicate_rate(self.duplicate)
            .with_reorder_rate(self.reorder)
            .with_delay(self.delay, self.max_delay);

        Scenario {
            message: self.message.clone(),
            config,
            data_channel: channel.with_seed(self.seed),
            ack_channel: channel.with_seed(self.seed.wrapping_add(1)),
            max_ticks: self.max_ticks,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let scenario = cli.scenario();
    log::info!(
        "Transferring {} bytes ({} per segment, window capacity {})",
        scenario.message.len(),
        scenario.config.segment_size,
        scenario.config.window_capacity
    );

    match sim::run(&scenario) {
        Ok(report) => {
            report.log();
            if report.completed {
                ExitCode::SUCCESS
            } else {
                log::error!("transfer did not complete within {} ticks", scenario.max_ticks);
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            ExitCode::FAILURE
        }
    }
}
