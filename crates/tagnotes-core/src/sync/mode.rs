//! Sync mode
//!
//! What the next scan event should do. Transient: never persisted, and back
//! to `Passive` once a scan is consumed or the pending action is cancelled.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Intent for the next scan event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Import the tag's notes (after confirmation)
    #[default]
    Passive,
    /// Copy the local list onto the tag
    PendingWrite,
    /// Exchange the local list with the tag's notes
    PendingSwap,
}

impl SyncMode {
    /// Next mode for a single toggle control: read → write → swap → read
    pub fn cycle(self) -> Self {
        match self {
            SyncMode::Passive => SyncMode::PendingWrite,
            SyncMode::PendingWrite => SyncMode::PendingSwap,
            SyncMode::PendingSwap => SyncMode::Passive,
        }
    }

    /// Whether a write or swap is armed
    pub fn is_pending(self) -> bool {
        self != SyncMode::Passive
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncMode::Passive => "read",
            SyncMode::PendingWrite => "write",
            SyncMode::PendingSwap => "swap",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" | "import" | "passive" => Ok(SyncMode::Passive),
            "write" | "export" => Ok(SyncMode::PendingWrite),
            "swap" => Ok(SyncMode::PendingSwap),
            other => Err(format!(
                "Unknown mode '{}'. Use read, write or swap.",
                other
            )),
        }
    }
}
