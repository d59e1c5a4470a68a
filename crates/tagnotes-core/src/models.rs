//! Data models for tagnotes
//!
//! A note is a plain value: label, content and a tag label. It has no
//! identity beyond its position in the owning list.

use serde::{Deserialize, Serialize};

/// A single note
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ListItem {
    /// Short title shown in the list
    #[serde(default)]
    pub label: String,
    /// Free-form body
    #[serde(default)]
    pub content: String,
    /// Tag label used for grouping and sorting
    #[serde(default)]
    pub tag: String,
}

impl ListItem {
    /// Create a note from its three fields
    pub fn new(
        label: impl Into<String>,
        content: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            tag: tag.into(),
        }
    }

    /// Create a note with only a label
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Set the tag label
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// True when every field is blank (whitespace only counts as blank)
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.content.trim().is_empty() && self.tag.trim().is_empty()
    }

    /// Total character count across all three fields
    pub fn char_count(&self) -> usize {
        self.label.chars().count() + self.content.chars().count() + self.tag.chars().count()
    }

    /// Text suitable for handing to a share sheet or clipboard
    ///
    /// Label and content are joined as `label:\ncontent`; when only one of
    /// them is non-blank it is returned alone. Returns `None` when there is
    /// nothing worth sharing.
    pub fn share_text(&self) -> Option<String> {
        let label_blank = self.label.trim().is_empty();
        let content_blank = self.content.trim().is_empty();

        match (label_blank, content_blank) {
            (false, false) => Some(format!("{}:\n{}", self.label, self.content)),
            (true, false) => Some(self.content.clone()),
            (false, true) => Some(self.label.clone()),
            (true, true) => None,
        }
    }
}

/// The note seeded into a fresh list on first start
pub fn welcome_item() -> ListItem {
    ListItem::new(
        "Welcome to tagnotes!",
        "Add notes with `tagnotes add`. Hold a tag to the reader and run \
         `tagnotes scan` to import its notes, `tagnotes scan --write` to copy \
         your list onto it, or `tagnotes scan --swap` to trade lists with it.",
        "Tutorial",
    )
}
