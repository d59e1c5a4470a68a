//! Tag transport
//!
//! The physical medium is an external collaborator. The core only needs a
//! byte channel that can be read, written and asked for its capacity, once
//! per scan event. The event object belongs to the caller; the core never
//! builds one.
//!
//! A transport returns either a complete payload or an explicit error,
//! never a truncated payload, and bounds its own I/O with a timeout.

mod file;

pub use file::{FileTag, FileTagScan, TagImage};

use thiserror::Error;

/// Byte channel to a tag
pub trait TagTransport {
    /// Whatever the platform delivers when something happens at the reader
    type Event;

    /// Whether the event is a tag scan (other events are ignored)
    fn is_scan_event(&self, event: &Self::Event) -> bool;

    /// Read the tag's current payload (empty for a blank tag)
    fn read_payload(&mut self, event: &Self::Event) -> Result<Vec<u8>, TagError>;

    /// Replace the tag's payload
    fn write_payload(&mut self, event: &Self::Event, payload: &[u8]) -> Result<(), TagError>;

    /// Capacity in bytes, `None` if the tag cannot report it
    fn max_capacity(&self, event: &Self::Event) -> Option<usize>;
}

/// Errors reported by a tag transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    /// The tag's contents could not be read
    #[error("Tag could not be read: {0}")]
    NotReadable(String),

    /// The tag is read-only
    #[error("Tag is not writable.")]
    NotWritable,

    /// The payload does not fit on the tag
    #[error("Notes need {needed} bytes but the tag holds {capacity} bytes.")]
    TooLarge { needed: usize, capacity: usize },

    /// Transport failure: tag removed, corrupted frame, cancelled, timed out
    #[error("Tag I/O failed: {0}")]
    Io(String),
}

impl TagError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TagError::NotReadable(_) => "not_readable",
            TagError::NotWritable => "not_writable",
            TagError::TooLarge { .. } => "too_large",
            TagError::Io(_) => "io",
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TagError::NotReadable(_) => {
                "Check that the tag is formatted and hold it steady against the reader."
            }
            TagError::NotWritable => "This tag is locked read-only. Use a different tag.",
            TagError::TooLarge { .. } => {
                "Remove or shorten some notes, or use a tag with more memory."
            }
            TagError::Io(_) => "Keep the tag against the reader until the operation finishes.",
        }
    }
}
