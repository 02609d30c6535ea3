//! # rdt - Reliable Data Transfer over an Unreliable Channel
//!
//! `rdt` delivers an ordered byte stream across a channel that may drop,
//! corrupt, reorder, delay, or duplicate segments. It provides:
//!
//! - **Fragmentation**: outbound data is split into fixed-size segments
//! - **Sliding window**: a fixed number of segments is in flight at once
//! - **Cumulative ACKs**: one acknowledgment per fully received window
//! - **CRC32 checksum**: corrupted segments are filtered on arrival
//! - **Idle timeouts**: silent ticks are counted against a threshold
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Application / Driver                  │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Session (one tick at a time)          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────┐   │
//! │  │ Send Window │ │ Reassembler │ │   Idle Timer    │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Wire Layer                            │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────┐   │
//! │  │  Segments   │ │  Checksum   │ │  Fragmentation  │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────┘   │
//! ├─────────────────────────────────────────────────────────┤
//! │                    Channel Layer                         │
//! │  ┌─────────────────────────────────────────────────┐   │
//! │  │     Unreliable channel (drop/corrupt/reorder)    │   │
//! │  └─────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rdt::channel::{self, UnreliableChannel};
//! use rdt::{Config, Session};
//!
//! let data_link = channel::shared(UnreliableChannel::lossless());
//! let ack_link = channel::shared(UnreliableChannel::lossless());
//!
//! let mut sender = Session::sender(
//!     Config::default(),
//!     "ABCDEFGHIJKLMNOP",
//!     data_link.clone(),
//!     ack_link.clone(),
//! )?;
//! let mut receiver = Session::receiver(Config::default(), ack_link, data_link)?;
//!
//! for _ in 0..10 {
//!     sender.tick();
//!     receiver.tick();
//! }
//! assert_eq!(receiver.received_string(), "ABCDEFGHIJKLMNOP");
//! # Ok::<(), rdt::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

pub mod buffer;
pub mod channel;
pub mod config;
pub mod error;
pub mod reliable;
pub mod session;
pub mod wire;

// Re-export commonly used types
pub use buffer::{ReceiveWindowPolicy, Window};
pub use channel::{Channel, ChannelConfig, SharedChannel, UnreliableChannel};
pub use config::Config;
pub use error::{Error, Result};
pub use reliable::{Reassembler, ResendPolicy};
pub use session::{Role, Session, SessionBuilder, SessionStats, TickOutcome};
pub use wire::{Crc32, Message, Segment};

/// Default payload length of one segment, in bytes.
pub const DEFAULT_SEGMENT_SIZE: usize = 4;

/// Default advertised flow-control window, in bytes.
pub const DEFAULT_WINDOW_CAPACITY: usize = 15;

/// Default number of consecutive idle ticks before a timeout is counted.
pub const DEFAULT_IDLE_THRESHOLD: u32 = 5;

/// Largest supported number of segments per window.
pub const MAX_SEGMENTS_PER_WINDOW: usize = 64;
