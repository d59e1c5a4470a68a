//! Command handlers
//!
//! Positions on the command line are 1-based, matching `tagnotes list`.

pub mod config;
pub mod item;
pub mod scan;
pub mod sort;
pub mod status;
pub mod tag;

use anyhow::{bail, Result};

/// Index of an existing note at a 1-based `position`
pub fn note_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        bail!(
            "No note at position {} (the list has {} note(s)).",
            position,
            len
        );
    }
    Ok(position - 1)
}

/// Index for inserting at a 1-based `position` (one past the end appends)
pub fn insert_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len + 1 {
        bail!(
            "Cannot insert at position {}; use 1 to {}.",
            position,
            len + 1
        );
    }
    Ok(position - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_index() {
        assert_eq!(note_index(1, 3).unwrap(), 0);
        assert_eq!(note_index(3, 3).unwrap(), 2);
        assert!(note_index(0, 3).is_err());
        assert!(note_index(4, 3).is_err());
        assert!(note_index(1, 0).is_err());
    }

    #[test]
    fn test_insert_index() {
        assert_eq!(insert_index(1, 0).unwrap(), 0);
        assert_eq!(insert_index(4, 3).unwrap(), 3);
        assert!(insert_index(5, 3).is_err());
        assert!(insert_index(0, 3).is_err());
    }
}
