//! Capacity guard
//!
//! Decides, before touching the tag, whether an encoded payload will fit.
//! The check is advisory: a write that passes can still fail at the
//! transport (tag pulled away, read-only tag). Its job is to stop writes
//! that are doomed by size and to say so clearly.
//!
//! Payloads are written as a single NDEF MIME record, so the space taken on
//! the tag is the payload plus the record header and the record type:
//!
//! ```text
//! flags(1) | type length(1) | payload length(1 or 4) | type | payload
//! ```

use crate::tag::{TagError, TagTransport};

/// Record type written when none is configured
pub const DEFAULT_RECORD_TYPE: &str = "application/x-tagnotes";

/// Payloads shorter than this use the one-byte length field (short record)
const SHORT_RECORD_LIMIT: usize = 256;

/// Pre-write size check for a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacityGuard {
    record_type: String,
}

impl Default for CapacityGuard {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_TYPE)
    }
}

impl CapacityGuard {
    /// Create a guard for records of the given MIME type
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
        }
    }

    /// The MIME type records are written with
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Ask the tag how many bytes it can hold
    ///
    /// `None` when the tag cannot report its capacity.
    pub fn max_capacity<T: TagTransport>(transport: &T, event: &T::Event) -> Option<usize> {
        transport.max_capacity(event)
    }

    /// Bytes of record framing around a payload of `payload_len` bytes
    pub fn overhead(&self, payload_len: usize) -> usize {
        let length_field = if payload_len < SHORT_RECORD_LIMIT { 1 } else { 4 };
        1 + 1 + length_field + self.record_type.len()
    }

    /// Bytes a payload takes on the tag once framed
    pub fn framed_len(&self, payload_len: usize) -> usize {
        payload_len + self.overhead(payload_len)
    }

    /// Whether `payload` fits on a tag holding `max_capacity` bytes
    ///
    /// An unknown capacity is not a reason to refuse; the transport gets
    /// the final say.
    pub fn fits(&self, payload: &[u8], max_capacity: Option<usize>) -> bool {
        self.check(payload, max_capacity).is_ok()
    }

    /// Like [`fits`](Self::fits), but reports the sizes on failure
    pub fn check(&self, payload: &[u8], max_capacity: Option<usize>) -> Result<(), TagError> {
        let Some(capacity) = max_capacity else {
            return Ok(());
        };

        let needed = self.framed_len(payload.len());
        if needed > capacity {
            return Err(TagError::TooLarge { needed, capacity });
        }
        Ok(())
    }

    /// Bytes left on the tag after writing `payload`, `None` if it won't fit
    pub fn remaining(&self, payload: &[u8], capacity: usize) -> Option<usize> {
        capacity.checked_sub(self.framed_len(payload.len()))
    }
}
