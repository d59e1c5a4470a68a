//! Import undo
//!
//! An accepted import remembers the list as it was before the tag's notes
//! were prepended. The record only applies while the list still looks
//! exactly as the import left it; any later change makes it stale.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::ListItem;
use crate::storage::persistence::atomic_write;

/// Snapshot taken around one accepted import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportUndo {
    before: Vec<ListItem>,
    after: Vec<ListItem>,
}

impl ImportUndo {
    pub fn new(before: Vec<ListItem>, after: Vec<ListItem>) -> Self {
        Self { before, after }
    }

    /// Number of notes the import prepended
    pub fn count(&self) -> usize {
        self.after.len().saturating_sub(self.before.len())
    }

    /// Whether `items` is still the list the import produced
    pub fn applies_to(&self, items: &[ListItem]) -> bool {
        self.after == items
    }

    /// The list as it was before the import
    pub fn before(&self) -> &[ListItem] {
        &self.before
    }

    pub fn into_before(self) -> Vec<ListItem> {
        self.before
    }

    /// Load a saved record, `None` if there is none
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read import undo from {:?}", path))?;
        let undo = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse import undo in {:?}", path))?;

        Ok(Some(undo))
    }

    /// Save the record, replacing any earlier one
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize import undo")?;
        atomic_write(path, content.as_bytes())
            .with_context(|| format!("Failed to save import undo to {:?}", path))
    }

    /// Forget a saved record
    pub fn discard(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to delete import undo {:?}", path))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn items(labels: &[&str]) -> Vec<ListItem> {
        labels.iter().map(|l| ListItem::with_label(*l)).collect()
    }

    #[test]
    fn test_count_and_applies_to() {
        let undo = ImportUndo::new(items(&["Local"]), items(&["T1", "T2", "Local"]));

        assert_eq!(undo.count(), 2);
        assert!(undo.applies_to(&items(&["T1", "T2", "Local"])));
        assert!(!undo.applies_to(&items(&["T1", "Local"])));
        assert_eq!(undo.into_before(), items(&["Local"]));
    }

    #[test]
    fn test_save_load_discard() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("last-import.json");
        assert_eq!(ImportUndo::load(&path).unwrap(), None);

        let undo = ImportUndo::new(Vec::new(), vec![ListItem::new("Milk", "2 l", "Groceries")]);
        undo.save(&path).unwrap();
        assert_eq!(ImportUndo::load(&path).unwrap(), Some(undo));

        ImportUndo::discard(&path).unwrap();
        assert_eq!(ImportUndo::load(&path).unwrap(), None);
        ImportUndo::discard(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("last-import.json");
        fs::write(&path, "not json").unwrap();

        assert!(ImportUndo::load(&path).is_err());
    }
}
