//! List persistence
//!
//! The store hands every encoded payload to a [`Persistence`] implementation
//! after each mutation, and loads from it once at startup.
//!
//! - [`FilePersistence`]: saves to `list.payload` in the data directory using
//!   atomic writes (write to temp file, then rename) to prevent corruption.
//! - [`MemoryPersistence`]: keeps the last payload in memory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::Config;

/// Load/save collaborator for the encoded list
pub trait Persistence {
    /// Load the last saved payload
    ///
    /// Returns `None` when nothing was ever saved, which is different from a
    /// saved empty list.
    fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the saved payload
    fn save(&mut self, payload: &[u8]) -> Result<()>;
}

/// File-backed persistence
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Create a persistence handler for the list file of the given config
    pub fn new(config: &Config) -> Self {
        Self::at(config.list_path())
    }

    /// Create a persistence handler for a specific file
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the list file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read list from {:?}", self.path))?;

        Ok(Some(bytes))
    }

    fn save(&mut self, payload: &[u8]) -> Result<()> {
        atomic_write(&self.path, payload)
            .with_context(|| format!("Failed to save list to {:?}", self.path))
    }
}

/// In-memory persistence
///
/// `fail_saves` makes every save return an error, which lets callers
/// exercise the store's best-effort save path.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    saved: Option<Vec<u8>>,
    save_count: usize,
    fail_saves: bool,
}

impl MemoryPersistence {
    /// Start with nothing saved
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously saved payload
    pub fn with_payload(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            saved: Some(payload.into()),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// The last successfully saved payload
    pub fn saved(&self) -> Option<&[u8]> {
        self.saved.as_deref()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, payload: &[u8]) -> Result<()> {
        if self.fail_saves {
            bail!("in-memory save rejected");
        }
        self.saved = Some(payload.to_vec());
        self.save_count += 1;
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// The target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    // Same directory, so the rename stays on one filesystem
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;

    file.write_all(data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;

    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = FilePersistence::at(temp_dir.path().join("list.payload"));

        assert!(persistence.load().unwrap().is_none());

        persistence.save(b"Milk\x1f\x1fGroceries").unwrap();
        assert!(persistence.path().exists());
        assert_eq!(
            persistence.load().unwrap().as_deref(),
            Some(&b"Milk\x1f\x1fGroceries"[..])
        );
    }

    #[test]
    fn test_saved_empty_list_is_not_missing() {
        let temp_dir = TempDir::new().unwrap();
        let mut persistence = FilePersistence::at(temp_dir.path().join("list.payload"));

        persistence.save(b"").unwrap();
        assert_eq!(persistence.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_file_persistence_uses_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };

        let persistence = FilePersistence::new(&config);
        assert_eq!(persistence.path(), config.list_path());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("list.payload");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        assert!(!nested_path.with_extension("tmp").exists());
        assert_eq!(fs::read(&nested_path).unwrap(), b"test data");
    }

    #[test]
    fn test_memory_persistence() {
        let mut persistence = MemoryPersistence::new();
        assert!(persistence.load().unwrap().is_none());

        persistence.save(b"one").unwrap();
        persistence.save(b"two").unwrap();
        assert_eq!(persistence.saved(), Some(&b"two"[..]));
        assert_eq!(persistence.save_count(), 2);

        persistence.set_fail_saves(true);
        assert!(persistence.save(b"three").is_err());
        assert_eq!(persistence.saved(), Some(&b"two"[..]));
        assert_eq!(persistence.save_count(), 2);
    }
}
