//! Scan outcomes and the presentation boundary

use thiserror::Error;

use crate::models::ListItem;
use crate::tag::TagError;

/// Result of one scan event or confirmation step
///
/// Each scan produces exactly one outcome, and the presenter hears about
/// each one once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Tag notes were prepended to the local list
    Imported { count: usize },
    /// The last import was taken back
    ImportUndone { count: usize },
    /// The local list was written to the tag
    Exported { bytes: usize },
    /// Local list and tag contents were exchanged
    Swapped { imported: usize, exported_bytes: usize },
    /// The tag holds no notes; nothing changed
    Empty,
    /// Tag notes are held until the user confirms or cancels
    AwaitingConfirmation { count: usize },
    /// The user declined the import; nothing changed
    Cancelled,
    /// The tag operation failed; the local list is unchanged
    Failed(TagError),
    /// The event was dropped without effect
    Ignored(IgnoreReason),
}

/// Why an event was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The event was not a tag scan
    NotAScan,
    /// An import confirmation is still open
    Busy,
    /// Confirm/cancel arrived with no import pending
    NothingPending,
    /// Undo asked for with no accepted import to take back
    NothingToUndo,
    /// The list changed after the import, so it can no longer be taken back
    UndoStale,
}

impl Outcome {
    /// Human-readable notification text
    pub fn message(&self) -> String {
        match self {
            Outcome::Imported { count } => format!("Imported {} note(s) from the tag.", count),
            Outcome::ImportUndone { count } => {
                format!("Removed {} imported note(s).", count)
            }
            Outcome::Exported { bytes } => format!("Wrote notes to the tag ({} bytes).", bytes),
            Outcome::Swapped { imported, .. } => {
                format!("Swapped notes with the tag; {} note(s) now local.", imported)
            }
            Outcome::Empty => "The tag has no notes.".to_string(),
            Outcome::AwaitingConfirmation { count } => {
                format!("Import {} note(s) from the tag?", count)
            }
            Outcome::Cancelled => "Import cancelled.".to_string(),
            Outcome::Failed(e) => e.to_string(),
            Outcome::Ignored(IgnoreReason::NotAScan) => "Not a tag scan.".to_string(),
            Outcome::Ignored(IgnoreReason::Busy) => {
                "Finish the pending import before scanning again.".to_string()
            }
            Outcome::Ignored(IgnoreReason::NothingPending) => "No import is pending.".to_string(),
            Outcome::Ignored(IgnoreReason::NothingToUndo) => "No import to undo.".to_string(),
            Outcome::Ignored(IgnoreReason::UndoStale) => {
                "The list changed since the import; it can no longer be undone.".to_string()
            }
        }
    }

    /// Whether this outcome reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Whether the local list changed
    pub fn changed_local(&self) -> bool {
        match self {
            Outcome::Imported { count } | Outcome::ImportUndone { count } => *count > 0,
            Outcome::Swapped { .. } => true,
            _ => false,
        }
    }
}

/// Answer to an import confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportDecision {
    /// Import now
    Accept,
    /// Drop the tag's notes
    Cancel,
    /// Keep them pending; answer later through the controller
    Defer,
}

/// Presentation collaborator
///
/// Purely advisory: the controller's state transitions never depend on
/// anything being rendered.
pub trait Presenter {
    /// Receive one outcome notification
    fn notify(&mut self, outcome: &Outcome);

    /// Asked before tag notes are imported
    fn confirm_import(&mut self, _items: &[ListItem]) -> ImportDecision {
        ImportDecision::Defer
    }
}

/// Errors from mode requests
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// An import confirmation has to be answered first
    #[error("An import from a tag is waiting for confirmation.")]
    ConfirmationPending,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_failed_is_failure() {
        assert!(Outcome::Failed(TagError::NotWritable).is_failure());
        assert!(!Outcome::Empty.is_failure());
        assert!(!Outcome::Ignored(IgnoreReason::Busy).is_failure());
    }

    #[test]
    fn test_changed_local() {
        assert!(Outcome::Imported { count: 2 }.changed_local());
        assert!(Outcome::Swapped {
            imported: 0,
            exported_bytes: 10
        }
        .changed_local());
        assert!(!Outcome::Exported { bytes: 10 }.changed_local());
        assert!(!Outcome::Cancelled.changed_local());
        assert!(Outcome::ImportUndone { count: 1 }.changed_local());
        assert!(!Outcome::Ignored(IgnoreReason::UndoStale).changed_local());
    }

    #[test]
    fn test_failure_message_is_error_text() {
        let outcome = Outcome::Failed(TagError::NotWritable);
        assert_eq!(outcome.message(), "Tag is not writable.");
    }

    #[test]
    fn test_default_decision_defers() {
        struct Silent;
        impl Presenter for Silent {
            fn notify(&mut self, _outcome: &Outcome) {}
        }

        assert_eq!(
            Silent.confirm_import(&[ListItem::with_label("x")]),
            ImportDecision::Defer
        );
    }
}
