//! tagnotes core library
//!
//! A short list of notes (label, content, tag) that lives on this machine
//! and can be carried between machines on an NFC tag.
//!
//! # Architecture
//!
//! - **Codec**: the list's compact byte form, shared by the tag and local
//!   storage
//! - **Store**: the in-memory list, saved after every change
//! - **Sync**: a scan-driven state machine that reads, writes or swaps the
//!   list with a tag
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut store = ListStore::open(FilePersistence::new(&config))?;
//!
//! store.add(ListItem::new("Milk", "2 litres", "Groceries"));
//!
//! let mut controller = SyncController::new(store, CapacityGuard::default());
//! controller.request_write()?;
//! let scan = FileTagScan::new(config.tag_path());
//! controller.handle_scan(&mut FileTag::default(), &scan, &mut presenter);
//! ```
//!
//! # Modules
//!
//! - `models`: the note item
//! - `codec`: list encoding and decoding
//! - `store`: ordered list with write-through persistence
//! - `storage`: persistence collaborators and store errors
//! - `capacity`: pre-write size check
//! - `tag`: tag transport trait and the file-backed tag
//! - `sync`: scan handling
//! - `config`: application configuration

pub mod capacity;
pub mod codec;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;
pub mod tag;

pub use capacity::{CapacityGuard, DEFAULT_RECORD_TYPE};
pub use config::Config;
pub use models::{welcome_item, ListItem};
pub use storage::{FilePersistence, MemoryPersistence, Persistence, StoreError, StoreResult};
pub use store::ListStore;
pub use sync::{
    IgnoreReason, ImportDecision, ImportUndo, Outcome, Presenter, SyncController, SyncError,
    SyncMode,
};
pub use tag::{FileTag, FileTagScan, TagError, TagImage, TagTransport};
