//! Sync controller
//!
//! Turns scan events into list/tag exchanges according to the current
//! [`SyncMode`]. One scan event is handled to completion before the next is
//! looked at; while an import waits for confirmation, further scans are
//! dropped.

use std::mem;

use tracing::{debug, info, warn};

use super::mode::SyncMode;
use super::outcome::{IgnoreReason, ImportDecision, Outcome, Presenter, SyncError};
use super::undo::ImportUndo;
use crate::capacity::CapacityGuard;
use crate::codec;
use crate::models::ListItem;
use crate::storage::Persistence;
use crate::store::ListStore;
use crate::tag::{TagError, TagTransport};

/// Scan-driven sync between the local list and a tag
#[derive(Debug)]
pub struct SyncController<P> {
    store: ListStore<P>,
    mode: SyncMode,
    pending_import: Option<Vec<ListItem>>,
    last_import: Option<ImportUndo>,
    guard: CapacityGuard,
}

impl<P: Persistence> SyncController<P> {
    /// Create a controller in `Passive` mode
    pub fn new(store: ListStore<P>, guard: CapacityGuard) -> Self {
        Self {
            store,
            mode: SyncMode::Passive,
            pending_import: None,
            last_import: None,
            guard,
        }
    }

    pub fn store(&self) -> &ListStore<P> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ListStore<P> {
        &mut self.store
    }

    pub fn into_store(self) -> ListStore<P> {
        self.store
    }

    /// What the next scan will do
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Notes read from a tag and waiting for confirmation
    pub fn pending_import(&self) -> Option<&[ListItem]> {
        self.pending_import.as_deref()
    }

    pub fn has_pending_import(&self) -> bool {
        self.pending_import.is_some()
    }

    /// Undo record of the last accepted import
    pub fn last_import(&self) -> Option<&ImportUndo> {
        self.last_import.as_ref()
    }

    /// Hand back an undo record kept from an earlier session
    pub fn restore_last_import(&mut self, undo: ImportUndo) {
        self.last_import = Some(undo);
    }

    // ==================== Mode requests ====================

    /// Arm the next scan to write the local list to the tag
    pub fn request_write(&mut self) -> Result<(), SyncError> {
        self.set_mode(SyncMode::PendingWrite)
    }

    /// Arm the next scan to swap the local list with the tag's notes
    pub fn request_swap(&mut self) -> Result<(), SyncError> {
        self.set_mode(SyncMode::PendingSwap)
    }

    /// Set the mode directly
    ///
    /// The latest request wins. Refused while an import awaits confirmation.
    pub fn set_mode(&mut self, mode: SyncMode) -> Result<(), SyncError> {
        if self.pending_import.is_some() {
            return Err(SyncError::ConfirmationPending);
        }
        if self.mode != mode {
            debug!("Sync mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        Ok(())
    }

    /// Advance read → write → swap → read, returning the new mode
    pub fn cycle_mode(&mut self) -> Result<SyncMode, SyncError> {
        let next = self.mode.cycle();
        self.set_mode(next)?;
        Ok(next)
    }

    /// Disarm a pending write or swap
    pub fn cancel_pending(&mut self) {
        if self.mode.is_pending() {
            debug!("Cancelled pending {}", self.mode);
        }
        self.mode = SyncMode::Passive;
    }

    // ==================== Scan handling ====================

    /// Handle one event from the reader
    ///
    /// Produces exactly one outcome, which is also passed to the presenter.
    /// Any mode other than `Passive` is consumed by the scan, whether the
    /// exchange succeeds or not.
    pub fn handle_scan<T: TagTransport>(
        &mut self,
        transport: &mut T,
        event: &T::Event,
        presenter: &mut impl Presenter,
    ) -> Outcome {
        if !transport.is_scan_event(event) {
            return self.emit(presenter, Outcome::Ignored(IgnoreReason::NotAScan));
        }
        if self.pending_import.is_some() {
            debug!("Scan dropped while an import is pending");
            return self.emit(presenter, Outcome::Ignored(IgnoreReason::Busy));
        }

        let outcome = match mem::take(&mut self.mode) {
            SyncMode::Passive => self.import(transport, event, presenter),
            SyncMode::PendingWrite => self.export(transport, event),
            SyncMode::PendingSwap => self.swap(transport, event),
        };
        self.emit(presenter, outcome)
    }

    /// Accept the pending import, prepending the tag's notes
    pub fn confirm_import(&mut self, presenter: &mut impl Presenter) -> Outcome {
        let outcome = match self.pending_import.take() {
            Some(items) => self.accept(items),
            None => Outcome::Ignored(IgnoreReason::NothingPending),
        };
        self.emit(presenter, outcome)
    }

    /// Drop the pending import, leaving the list unchanged
    pub fn cancel_import(&mut self, presenter: &mut impl Presenter) -> Outcome {
        let outcome = match self.pending_import.take() {
            Some(_) => Outcome::Cancelled,
            None => Outcome::Ignored(IgnoreReason::NothingPending),
        };
        self.emit(presenter, outcome)
    }

    /// Take back the last accepted import
    ///
    /// Restores the list as it was before the import, provided nothing
    /// changed it since. The record is used up either way.
    pub fn undo_import(&mut self, presenter: &mut impl Presenter) -> Outcome {
        let outcome = match self.last_import.take() {
            None => Outcome::Ignored(IgnoreReason::NothingToUndo),
            Some(undo) if !undo.applies_to(self.store.items()) => {
                Outcome::Ignored(IgnoreReason::UndoStale)
            }
            Some(undo) => {
                let count = undo.count();
                self.store.replace_all(undo.into_before());
                Outcome::ImportUndone { count }
            }
        };
        self.emit(presenter, outcome)
    }

    fn import<T: TagTransport>(
        &mut self,
        transport: &mut T,
        event: &T::Event,
        presenter: &mut impl Presenter,
    ) -> Outcome {
        let payload = match transport.read_payload(event) {
            Ok(payload) => payload,
            Err(e) => return Outcome::Failed(e),
        };

        let items = codec::decode(&payload);
        if items.is_empty() {
            return Outcome::Empty;
        }

        match presenter.confirm_import(&items) {
            ImportDecision::Accept => self.accept(items),
            ImportDecision::Cancel => Outcome::Cancelled,
            ImportDecision::Defer => {
                let count = items.len();
                self.pending_import = Some(items);
                Outcome::AwaitingConfirmation { count }
            }
        }
    }

    fn accept(&mut self, items: Vec<ListItem>) -> Outcome {
        let before = self.store.items().to_vec();
        let count = self.store.add_all(items);
        if count > 0 {
            self.last_import = Some(ImportUndo::new(before, self.store.items().to_vec()));
        }
        Outcome::Imported { count }
    }

    fn export<T: TagTransport>(&mut self, transport: &mut T, event: &T::Event) -> Outcome {
        let payload = self.store.payload();
        match self.write_checked(transport, event, &payload) {
            Ok(()) => Outcome::Exported {
                bytes: payload.len(),
            },
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Read first, then write; the local list only changes once both
    /// succeeded
    fn swap<T: TagTransport>(&mut self, transport: &mut T, event: &T::Event) -> Outcome {
        let incoming = match transport.read_payload(event) {
            Ok(payload) => codec::decode(&payload),
            Err(e) => return Outcome::Failed(e),
        };

        let outgoing = self.store.payload();
        if let Err(e) = self.write_checked(transport, event, &outgoing) {
            return Outcome::Failed(e);
        }

        let imported = incoming.len();
        self.store.replace_all(incoming);
        Outcome::Swapped {
            imported,
            exported_bytes: outgoing.len(),
        }
    }

    fn write_checked<T: TagTransport>(
        &self,
        transport: &mut T,
        event: &T::Event,
        payload: &[u8],
    ) -> Result<(), TagError> {
        let capacity = CapacityGuard::max_capacity(transport, event);
        self.guard.check(payload, capacity)?;
        transport.write_payload(event, payload)
    }

    fn emit(&self, presenter: &mut impl Presenter, outcome: Outcome) -> Outcome {
        match &outcome {
            Outcome::Failed(e) => warn!("Tag {} failed: {}", e.kind(), e),
            Outcome::Ignored(reason) => debug!("Event ignored: {:?}", reason),
            other => info!("{}", other.message()),
        }
        presenter.notify(&outcome);
        outcome
    }
}
