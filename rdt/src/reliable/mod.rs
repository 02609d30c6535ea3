//! Reliability mechanisms.
//!
//! This module provides:
//! - Reassembler: admitted segments keyed by sequence number, read back in order
//! - IdleTimer: consecutive idle-tick counting against a threshold

mod reassembler;
mod timer;

pub use reassembler::Reassembler;
pub use timer::{IdleTimer, IdleVerdict, ResendPolicy};
