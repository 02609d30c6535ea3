//! Channel abstraction.
//!
//! This module provides the `Channel` trait that a session sends segments
//! into and drains segments from. A channel is unidirectional: one session
//! sends into it, its peer receives from it.
//!
//! # Implementations
//!
//! - `UnreliableChannel`: in-memory queue with a seeded fault model
//! - `Rc<RefCell<C>>`: shared handle so both sessions can hold the same channel
//!
//! # Example
//!
//! ```rust
//! use rdt::channel::{self, Channel, UnreliableChannel};
//! use rdt::Segment;
//!
//! let link = channel::shared(UnreliableChannel::lossless());
//! let mut tx = link.clone();
//! let mut rx = link;
//!
//! tx.send(Segment::ack(4));
//! assert!(rx.has_pending());
//! assert_eq!(rx.receive(), vec![Segment::ack(4)]);
//! assert!(rx.receive().is_empty());
//! ```

mod unreliable;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::wire::Segment;

pub use unreliable::{ChannelConfig, ChannelStats, UnreliableChannel};

/// A unidirectional, non-blocking segment queue.
pub trait Channel {
    /// Enqueues a segment for the peer. The channel may lose or alter it.
    fn send(&mut self, segment: Segment);

    /// Drains every segment currently deliverable, in delivery order.
    ///
    /// Returns an empty vector when nothing new has arrived.
    fn receive(&mut self) -> Vec<Segment>;

    /// Returns true if `receive` would return at least one segment.
    fn has_pending(&self) -> bool;
}

/// Single-threaded handle to a channel shared by two sessions.
pub type SharedChannel<C = UnreliableChannel> = Rc<RefCell<C>>;

/// Wraps a channel so that the sending and receiving sessions can share it.
pub fn shared<C: Channel>(channel: C) -> SharedChannel<C> {
    Rc::new(RefCell::new(channel))
}

impl<C: Channel + ?Sized> Channel for Rc<RefCell<C>> {
    fn send(&mut self, segment: Segment) {
        self.borrow_mut().send(segment);
    }

    fn receive(&mut self) -> Vec<Segment> {
        self.borrow_mut().receive()
    }

    fn has_pending(&self) -> bool {
        self.borrow().has_pending()
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn send(&mut self, segment: Segment) {
        (**self).send(segment);
    }

    fn receive(&mut self) -> Vec<Segment> {
        (**self).receive()
    }

    fn has_pending(&self) -> bool {
        (**self).has_pending()
    }
}
