//! CRC32 (IEEE 802.3, reflected) used for segment checksums.
//!
//! ```rust
//! use rdt::Crc32;
//!
//! let mut crc = Crc32::new();
//! crc.update_u32(7).update(b"ABCD");
//! assert_ne!(crc.finalize(), Crc32::checksum(b"ABCD"));
//! ```

const POLYNOMIAL: u32 = 0xEDB88320;

const TABLE: [u32; 256] = build_table();

const fn build_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut value = n as u32;
        let mut bit = 0;
        while bit < 8 {
            value = if value & 1 == 1 {
                (value >> 1) ^ POLYNOMIAL
            } else {
                value >> 1
            };
            bit += 1;
        }
        table[n] = value;
        n += 1;
    }
    table
}

/// Incremental CRC32 calculator.
///
/// Segment fields are fed one after another, so the checksum covers
/// the sequence number, the ACK number and the payload together.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    #[inline]
    pub const fn new() -> Self {
        Self { state: !0 }
    }

    /// Feeds raw bytes.
    #[inline]
    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        for &byte in bytes {
            let index = (self.state as u8 ^ byte) as usize;
            self.state = (self.state >> 8) ^ TABLE[index];
        }
        self
    }

    /// Feeds a 32-bit field in network byte order.
    #[inline]
    pub fn update_u32(&mut self, value: u32) -> &mut Self {
        self.update(&value.to_be_bytes())
    }

    #[inline]
    pub const fn finalize(&self) -> u32 {
        !self.state
    }

    /// One-shot checksum of a byte slice.
    pub fn checksum(bytes: &[u8]) -> u32 {
        Self::new().update(bytes).finalize()
    }
}
