//! Note command handlers

use anyhow::{bail, Context, Result};

use tagnotes_core::{ListItem, ListStore, Persistence};

use super::{insert_index, note_index};
use crate::editor::{confirm, edit_item};
use crate::output::{Output, OutputFormat};

/// Fields given on the command line
pub struct ItemFields {
    pub label: Option<String>,
    pub content: Option<String>,
    pub tag: Option<String>,
}

impl ItemFields {
    fn is_empty(&self) -> bool {
        self.label.is_none() && self.content.is_none() && self.tag.is_none()
    }

    fn into_item(self) -> ListItem {
        ListItem::new(
            self.label.unwrap_or_default(),
            self.content.unwrap_or_default(),
            self.tag.unwrap_or_default(),
        )
    }

    fn apply_to(self, item: &mut ListItem) {
        if let Some(label) = self.label {
            item.label = label;
        }
        if let Some(content) = self.content {
            item.set_content(content);
        }
        if let Some(tag) = self.tag {
            item.set_tag(tag);
        }
    }
}

/// List all notes
pub fn list<P: Persistence>(store: &ListStore<P>, output: &Output) -> Result<()> {
    output.print_items(store.items());
    Ok(())
}

/// Show one note, or its share text
pub fn show<P: Persistence>(
    store: &ListStore<P>,
    position: usize,
    share: bool,
    output: &Output,
) -> Result<()> {
    let index = note_index(position, store.len())?;
    let item = store.get(index)?;

    if !share {
        output.print_item(index, item);
        return Ok(());
    }

    let Some(text) = item.share_text() else {
        bail!("Note {} has no label or content to share.", position);
    };
    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "text": text })),
        _ => println!("{}", text),
    }
    Ok(())
}

/// Add a note at the front (or back)
pub fn add<P: Persistence>(
    store: &mut ListStore<P>,
    fields: ItemFields,
    back: bool,
    output: &Output,
) -> Result<()> {
    let item = fields.into_item();
    if item.is_blank() {
        bail!("A note needs a label, content or tag.");
    }

    let label = item.label.clone();
    let position = if back {
        store.add_to_back(item);
        store.len()
    } else {
        store.add(item);
        1
    };

    output.success(&format!("Added note {}: {}", position, label));
    Ok(())
}

/// Insert a note at a position
pub fn insert<P: Persistence>(
    store: &mut ListStore<P>,
    position: usize,
    fields: ItemFields,
    output: &Output,
) -> Result<()> {
    let index = insert_index(position, store.len())?;
    let item = fields.into_item();
    let label = item.label.clone();

    store.insert(index, item).context("Failed to insert note")?;

    output.success(&format!("Inserted note {}: {}", position, label));
    Ok(())
}

/// Edit a note in place
///
/// With no fields given, the note is opened in the user's editor.
pub fn edit<P: Persistence>(
    store: &mut ListStore<P>,
    position: usize,
    fields: ItemFields,
    output: &Output,
) -> Result<()> {
    let index = note_index(position, store.len())?;
    let mut item = store.get(index)?.clone();

    if fields.is_empty() {
        item = edit_item(&item)?;
    } else {
        fields.apply_to(&mut item);
    }

    if store.get(index)? == &item {
        output.message("No changes.");
        return Ok(());
    }

    store.set(index, item).context("Failed to update note")?;
    output.success(&format!("Updated note {}", position));
    Ok(())
}

/// Remove a note, printing how to put it back
pub fn remove<P: Persistence>(
    store: &mut ListStore<P>,
    position: usize,
    output: &Output,
) -> Result<()> {
    let index = note_index(position, store.len())?;
    let removed = store.remove(index).context("Failed to remove note")?;

    match output.format {
        OutputFormat::Human => {
            println!("✓ Removed note {}: {}", position, removed.label);
            println!("  Undo with: {}", undo_command(position, &removed));
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "success",
                    "position": position,
                    "removed": removed,
                })
            );
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Move a note to another position
pub fn move_note<P: Persistence>(
    store: &mut ListStore<P>,
    from: usize,
    to: usize,
    output: &Output,
) -> Result<()> {
    let len = store.len();
    let from_index = note_index(from, len)?;
    let to_index = note_index(to, len)?;

    store
        .move_item(from_index, to_index)
        .context("Failed to move note")?;

    output.success(&format!("Moved note {} to {}", from, to));
    Ok(())
}

/// Send the first note to the back, or any other note to the front
pub fn bump<P: Persistence>(
    store: &mut ListStore<P>,
    position: usize,
    output: &Output,
) -> Result<()> {
    let index = note_index(position, store.len())?;
    let target = store.bump(index).context("Failed to move note")?;

    output.success(&format!("Moved note {} to {}", position, target + 1));
    Ok(())
}

/// Remove every note
pub fn clear<P: Persistence>(store: &mut ListStore<P>, yes: bool, output: &Output) -> Result<()> {
    if store.is_empty() {
        output.message("The list is already empty.");
        return Ok(());
    }

    let prompt = format!("Remove all {} note(s)?", store.len());
    if !yes && output.should_prompt() && !confirm(&prompt)? {
        println!("Cancelled.");
        return Ok(());
    }

    let count = store.len();
    store.clear();
    output.success(&format!("Removed {} note(s)", count));
    Ok(())
}

/// Command that re-inserts a removed note where it was
///
/// Options come before `--` so a label starting with `-` stays positional.
fn undo_command(position: usize, item: &ListItem) -> String {
    let mut command = format!("tagnotes insert {}", position);
    if !item.content.is_empty() {
        command.push_str(&format!(" --content={}", shell_quote(&item.content)));
    }
    if !item.tag.is_empty() {
        command.push_str(&format!(" --tag={}", shell_quote(&item.tag)));
    }
    command.push_str(&format!(" -- {}", shell_quote(&item.label)));
    command
}

/// Quote a word for a POSIX shell
///
/// Single quotes keep every byte literal; an embedded `'` becomes `'\''`.
fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}
