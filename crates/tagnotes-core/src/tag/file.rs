//! File-backed tag
//!
//! Stands in for a physical tag: a small JSON image holding the tag's
//! capacity, its write-protection flag and the current record. A scan event
//! is "the image at this path is present at the reader".
//!
//! ```json
//! {
//!   "capacity": 504,
//!   "writable": true,
//!   "record_type": "application/x-tagnotes",
//!   "payload": "TWlsax8fR3JvY2VyaWVz",
//!   "written_at": "2026-10-15T09:30:00Z"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TagError, TagTransport};
use crate::capacity::CapacityGuard;
use crate::storage::persistence::atomic_write;

/// On-disk image of a tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagImage {
    /// Usable bytes, `None` when the tag does not report it
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Cleared for read-only tags
    #[serde(default = "default_writable")]
    pub writable: bool,

    /// MIME type of the stored record, `None` for a blank tag
    #[serde(default)]
    pub record_type: Option<String>,

    /// Record payload, base64
    #[serde(default)]
    pub payload: String,

    /// When the record was last written
    #[serde(default)]
    pub written_at: Option<DateTime<Utc>>,
}

impl TagImage {
    /// A freshly formatted tag with no record
    pub fn blank(capacity: Option<usize>, writable: bool) -> Self {
        Self {
            capacity,
            writable,
            record_type: None,
            payload: String::new(),
            written_at: None,
        }
    }

    /// Decode the stored payload
    pub fn payload_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.payload)
    }

    /// Replace the stored record
    pub fn set_payload(&mut self, payload: &[u8], record_type: &str) {
        self.payload = STANDARD.encode(payload);
        self.record_type = Some(record_type.to_string());
        self.written_at = Some(Utc::now());
    }

    /// Load an image from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag image {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid tag image {:?}", path))
    }

    /// Save an image to disk atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize tag image")?;
        atomic_write(path, json.as_bytes())
    }
}

fn default_writable() -> bool {
    true
}

/// Scan event for a file-backed tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTagScan {
    /// Location of the tag image
    pub path: PathBuf,
}

impl FileTagScan {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Transport over file-backed tags
#[derive(Debug, Clone, Default)]
pub struct FileTag {
    guard: CapacityGuard,
}

impl FileTag {
    /// Create a transport writing records framed by `guard`
    pub fn new(guard: CapacityGuard) -> Self {
        Self { guard }
    }

    /// Format a tag image at `path`, discarding any previous contents
    pub fn format(path: &Path, capacity: Option<usize>, writable: bool) -> Result<TagImage> {
        let image = TagImage::blank(capacity, writable);
        image
            .save(path)
            .with_context(|| format!("Failed to format tag at {:?}", path))?;
        Ok(image)
    }
}

impl TagTransport for FileTag {
    type Event = FileTagScan;

    fn is_scan_event(&self, event: &FileTagScan) -> bool {
        event.path.is_file()
    }

    fn read_payload(&mut self, event: &FileTagScan) -> Result<Vec<u8>, TagError> {
        let image =
            TagImage::load(&event.path).map_err(|e| TagError::NotReadable(format!("{:#}", e)))?;

        // Records of another type belong to another application
        if let Some(ref record_type) = image.record_type {
            if record_type != self.guard.record_type() {
                return Err(TagError::NotReadable(format!(
                    "tag holds a {} record, expected {}",
                    record_type,
                    self.guard.record_type()
                )));
            }
        }

        let payload = image
            .payload_bytes()
            .map_err(|e| TagError::NotReadable(format!("corrupt payload: {}", e)))?;
        debug!("Read {} bytes from {:?}", payload.len(), event.path);
        Ok(payload)
    }

    fn write_payload(&mut self, event: &FileTagScan, payload: &[u8]) -> Result<(), TagError> {
        let mut image =
            TagImage::load(&event.path).map_err(|e| TagError::Io(format!("{:#}", e)))?;

        if !image.writable {
            return Err(TagError::NotWritable);
        }
        self.guard.check(payload, image.capacity)?;

        image.set_payload(payload, self.guard.record_type());
        image
            .save(&event.path)
            .map_err(|e| TagError::Io(format!("{:#}", e)))?;
        debug!("Wrote {} bytes to {:?}", payload.len(), event.path);
        Ok(())
    }

    fn max_capacity(&self, event: &FileTagScan) -> Option<usize> {
        TagImage::load(&event.path).ok().and_then(|image| image.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn formatted(temp_dir: &TempDir, capacity: Option<usize>, writable: bool) -> FileTagScan {
        let path = temp_dir.path().join("tag.json");
        FileTag::format(&path, capacity, writable).unwrap();
        FileTagScan::new(path)
    }

    #[test]
    fn test_missing_image_is_not_a_scan() {
        let temp_dir = TempDir::new().unwrap();
        let tag = FileTag::default();
        assert!(!tag.is_scan_event(&FileTagScan::new(temp_dir.path().join("absent.json"))));
        assert!(!tag.is_scan_event(&FileTagScan::new(temp_dir.path())));
    }

    #[test]
    fn test_blank_tag_reads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, Some(504), true);
        let mut tag = FileTag::default();

        assert!(tag.is_scan_event(&scan));
        assert!(tag.read_payload(&scan).unwrap().is_empty());
        assert_eq!(tag.max_capacity(&scan), Some(504));
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, Some(504), true);
        let mut tag = FileTag::default();

        tag.write_payload(&scan, b"Milk\x1f\x1fGroceries").unwrap();
        assert_eq!(tag.read_payload(&scan).unwrap(), b"Milk\x1f\x1fGroceries");

        let image = TagImage::load(&scan.path).unwrap();
        assert!(image.written_at.is_some());
        assert_eq!(image.record_type.as_deref(), Some(crate::DEFAULT_RECORD_TYPE));
    }

    #[test]
    fn test_read_only_tag_refuses_write() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, Some(504), false);
        let mut tag = FileTag::default();

        assert_eq!(tag.write_payload(&scan, b"x"), Err(TagError::NotWritable));
        assert!(tag.read_payload(&scan).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_write_is_refused_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, Some(32), true);
        let mut tag = FileTag::default();

        let err = tag.write_payload(&scan, &[b'x'; 64]).unwrap_err();
        assert!(matches!(err, TagError::TooLarge { capacity: 32, .. }));
        assert!(tag.read_payload(&scan).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_capacity() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, None, true);
        let mut tag = FileTag::default();

        assert_eq!(tag.max_capacity(&scan), None);
        tag.write_payload(&scan, &[b'x'; 4096]).unwrap();
    }

    #[test]
    fn test_foreign_record_type_is_not_readable() {
        let temp_dir = TempDir::new().unwrap();
        let scan = formatted(&temp_dir, Some(504), true);

        let mut other = FileTag::new(CapacityGuard::new("text/plain"));
        other.write_payload(&scan, b"hello").unwrap();

        let mut tag = FileTag::default();
        let err = tag.read_payload(&scan).unwrap_err();
        assert!(matches!(err, TagError::NotReadable(ref msg) if msg.contains("text/plain")));
    }

    #[test]
    fn test_corrupt_image_is_not_readable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tag.json");
        fs::write(&path, "not json").unwrap();
        let scan = FileTagScan::new(path);
        let mut tag = FileTag::default();

        assert!(tag.is_scan_event(&scan));
        assert!(matches!(
            tag.read_payload(&scan),
            Err(TagError::NotReadable(_))
        ));
        assert!(matches!(tag.write_payload(&scan, b"x"), Err(TagError::Io(_))));
        assert_eq!(tag.max_capacity(&scan), None);
    }
}
