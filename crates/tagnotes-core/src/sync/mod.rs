//! Scan-driven sync with a tag
//!
//! ## Modes
//!
//! 1. **Read** (passive): a scan reads the tag and, once confirmed, prepends
//!    its notes to the local list
//! 2. **Write**: a scan copies the local list onto the tag
//! 3. **Swap**: a scan reads the tag, writes the local list, then replaces
//!    the local list with what was read
//!
//! Write and swap are one-shot: the scan that consumes them drops the
//! controller back to read mode.
//!
//! An accepted import can be taken back with
//! [`SyncController::undo_import`] as long as the list has not changed since.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SyncController::new(store, CapacityGuard::default());
//! controller.request_write()?;
//! let outcome = controller.handle_scan(&mut FileTag::default(), &scan, &mut presenter);
//! ```

mod controller;
mod mode;
mod outcome;
mod undo;

pub use controller::SyncController;
pub use mode::SyncMode;
pub use outcome::{IgnoreReason, ImportDecision, Outcome, Presenter, SyncError};
pub use undo::ImportUndo;
