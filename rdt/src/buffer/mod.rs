//! Window bookkeeping.
//!
//! A single `Window` holds the `[low, high]` bounds shared by the send
//! path (which slides it on a matching ACK) and the receive path (which
//! filters inbound segments against it).

mod window;

pub use window::{ReceiveWindowPolicy, Window};
