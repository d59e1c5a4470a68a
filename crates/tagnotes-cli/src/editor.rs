//! Interactive editing support
//!
//! Opens $EDITOR for editing a note, and asks yes/no questions.
//!
//! A note is edited as a small text document:
//!
//! ```text
//! Label: Milk
//! Tag: Groceries
//! ---
//! 2 litres, semi-skimmed
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use tagnotes_core::ListItem;

/// Line between the header fields and the content
const CONTENT_MARKER: &str = "---";

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("tagnotes_edit_{}.txt", std::process::id()));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;

    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Edit a note in the user's editor
pub fn edit_item(item: &ListItem) -> Result<ListItem> {
    let edited = edit_text(&render_item(item))?;
    parse_item(&edited)
}

/// Render a note for editing
pub fn render_item(item: &ListItem) -> String {
    format!(
        "Label: {}\nTag: {}\n{}\n{}",
        item.label, item.tag, CONTENT_MARKER, item.content
    )
}

/// Parse an edited note
///
/// Header lines other than `Label:` and `Tag:` are ignored. Editors append a
/// final newline, so one trailing newline is dropped from the content.
pub fn parse_item(text: &str) -> Result<ListItem> {
    let mut item = ListItem::default();
    let mut rest = text;

    loop {
        let Some((line, tail)) = split_line(rest) else {
            bail!(
                "Missing '{}' line between the header and the content.",
                CONTENT_MARKER
            );
        };
        rest = tail;

        if line.trim_end() == CONTENT_MARKER {
            break;
        }
        if let Some(label) = line.strip_prefix("Label:") {
            item.label = label.trim().to_string();
        } else if let Some(tag) = line.strip_prefix("Tag:") {
            item.tag = tag.trim().to_string();
        }
    }

    let content = rest.strip_suffix('\n').unwrap_or(rest);
    item.content = content.strip_suffix('\r').unwrap_or(content).to_string();
    Ok(item)
}

/// Split off the first line, `None` once the text is used up
fn split_line(text: &str) -> Option<(&str, &str)> {
    if text.is_empty() {
        return None;
    }
    match text.split_once('\n') {
        Some((line, rest)) => Some((line.trim_end_matches('\r'), rest)),
        None => Some((text, "")),
    }
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    let common_editors = ["nano", "vim", "vi", "emacs", "notepad"];

    for editor in common_editors {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_then_parse() {
        let item = ListItem::new("Milk", "2 litres\nsemi-skimmed", "Groceries");
        let parsed = parse_item(&format!("{}\n", render_item(&item))).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_parse_ignores_unknown_headers() {
        let text = "# edit below\nTag: Work\nLabel:  Call Bob \n---\nRe: meeting";
        let parsed = parse_item(text).unwrap();
        assert_eq!(parsed, ListItem::new("Call Bob", "Re: meeting", "Work"));
    }

    #[test]
    fn test_parse_keeps_marker_lines_in_content() {
        let parsed = parse_item("Label: A\n---\nbefore\n---\nafter\n").unwrap();
        assert_eq!(parsed.content, "before\n---\nafter");
    }

    #[test]
    fn test_parse_empty_content() {
        let parsed = parse_item("Label: A\nTag:\n---\n").unwrap();
        assert_eq!(parsed, ListItem::with_label("A"));
    }

    #[test]
    fn test_parse_requires_marker() {
        assert!(parse_item("Label: A\nTag: B\n").is_err());
        assert!(parse_item("").is_err());
    }

    #[test]
    fn test_command_exists() {
        #[cfg(unix)]
        assert!(command_exists("ls"));

        assert!(!command_exists("definitely_not_a_real_command_12345"));
    }
}
