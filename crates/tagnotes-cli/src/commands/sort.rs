//! Sort command handler

use anyhow::Result;
use clap::ValueEnum;

use tagnotes_core::{ListStore, Persistence};

use crate::output::Output;

/// Sort orders offered on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    /// Alphabetical by label
    Label,
    /// By tag, then label
    Tag,
    /// Longest label first
    Length,
    /// Most text first, counting every field
    Size,
}

impl SortKey {
    fn name(self) -> &'static str {
        match self {
            SortKey::Label => "label",
            SortKey::Tag => "tag",
            SortKey::Length => "length",
            SortKey::Size => "size",
        }
    }
}

/// Reorder the list
pub fn sort<P: Persistence>(
    store: &mut ListStore<P>,
    key: SortKey,
    output: &Output,
) -> Result<()> {
    match key {
        SortKey::Label => store.sort_by_label(),
        SortKey::Tag => store.sort_by_tag(),
        SortKey::Length => store.sort_by_length(),
        SortKey::Size => store.sort_by_size(),
    }

    if output.should_prompt() {
        output.print_items(store.items());
    } else {
        output.success(&format!("Sorted {} note(s) by {}", store.len(), key.name()));
    }
    Ok(())
}
