//! Store error handling
//!
//! Typed errors for list operations with descriptive messages and recovery
//! suggestions.

use thiserror::Error;

/// Errors that can occur during list store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A position outside the list was passed in
    ///
    /// This is a caller bug, never clamped.
    #[error("Position {position} is out of range for a list of {len} item(s)")]
    Index { position: usize, len: usize },

    /// The saved list could not be loaded when the store was opened
    #[error("Failed to load the saved list: {details}")]
    Load { details: String },
}

impl StoreError {
    /// Build a load error from any persistence failure, keeping the full chain
    pub fn load(error: anyhow::Error) -> Self {
        StoreError::Load {
            details: format!("{:#}", error),
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::Load { .. } => Some(
                "Check that the data directory is readable. Moving the list file aside starts a fresh list.",
            ),
            StoreError::Index { .. } => None,
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fail with `StoreError::Index` unless `position < len`
pub(crate) fn check_access(position: usize, len: usize) -> StoreResult<()> {
    if position < len {
        Ok(())
    } else {
        Err(StoreError::Index { position, len })
    }
}

/// Fail with `StoreError::Index` unless `position <= len`
pub(crate) fn check_insert(position: usize, len: usize) -> StoreResult<()> {
    if position <= len {
        Ok(())
    } else {
        Err(StoreError::Index { position, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_index_bounds() {
        assert!(check_access(0, 1).is_ok());
        assert!(check_access(1, 1).is_err());
        assert!(check_insert(1, 1).is_ok());
        assert!(check_insert(2, 1).is_err());
        assert!(check_access(0, 0).is_err());
        assert!(check_insert(0, 0).is_ok());
    }

    #[test]
    fn test_index_display() {
        let err = StoreError::Index {
            position: 5,
            len: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_load_keeps_context_chain() {
        let source: anyhow::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire").into());
        let err = StoreError::load(source.context("Failed to read list").unwrap_err());

        let msg = err.to_string();
        assert!(msg.contains("Failed to read list"));
        assert!(msg.contains("disk on fire"));
        assert!(err.recovery_suggestion().is_some());
    }
}
