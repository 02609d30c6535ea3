/// Counters describing a session's protocol activity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    /// Data segments handed to the send channel.
    pub data_segments_sent: u64,

    /// Data segments sent for a sequence number that was already sent.
    pub retransmissions: u64,

    /// ACK segments handed to the send channel.
    pub acks_sent: u64,

    /// ACK-bearing segments drained by the send path.
    pub acks_received: u64,

    /// Window advances caused by a matching ACK.
    pub window_advances: u64,

    /// Segments newly admitted to the reassembly buffer.
    pub segments_admitted: u64,

    /// Data segments rejected because the checksum did not match.
    pub checksum_failures: u64,

    /// Data segments ignored as duplicates, within a batch or of the buffer.
    pub duplicates: u64,

    /// Data segments rejected for lying outside the window.
    pub out_of_window: u64,

    /// Ticks on which the idle threshold had been reached.
    pub timeout_events: u64,
}

impl SessionStats {
    pub const fn new() -> Self {
        Self {
            data_segments_sent: 0,
            retransmissions: 0,
            acks_sent: 0,
            acks_received: 0,
            window_advances: 0,
            segments_admitted: 0,
            checksum_failures: 0,
            duplicates: 0,
            out_of_window: 0,
            timeout_events: 0,
        }
    }

    /// Share of sent data segments that were retransmissions, in percent.
    pub fn retransmit_rate(&self) -> f32 {
        if self.data_segments_sent == 0 {
            0.0
        } else {
            (self.retransmissions as f32 / self.data_segments_sent as f32) * 100.0
        }
    }
}
