//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;
use tagnotes_core::{ListItem, Outcome};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// A note as shown to the user, with its 1-based position
#[derive(Serialize)]
struct ItemRow<'a> {
    position: usize,
    label: &'a str,
    content: &'a str,
    tag: &'a str,
}

impl<'a> ItemRow<'a> {
    fn new(index: usize, item: &'a ListItem) -> Self {
        Self {
            position: index + 1,
            label: &item.label,
            content: &item.content,
            tag: &item.tag,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print one note in full
    pub fn print_item(&self, index: usize, item: &ListItem) {
        match self.format {
            OutputFormat::Human => {
                println!("Position: {}", index + 1);
                println!("Label:    {}", item.label);
                if !item.tag.is_empty() {
                    println!("Tag:      {}", item.tag);
                }
                if !item.content.is_empty() {
                    println!();
                    println!("{}", item.content);
                }
            }
            OutputFormat::Json => {
                println!("{:#}", serde_json::json!(ItemRow::new(index, item)));
            }
            OutputFormat::Quiet => {
                println!("{}", item.label);
            }
        }
    }

    /// Print the whole list
    pub fn print_items(&self, items: &[ListItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No notes.");
                    return;
                }
                for (index, item) in items.iter().enumerate() {
                    let tag = if item.tag.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", truncate(&item.tag, 15))
                    };
                    println!(
                        "{:>3}. {}{}  {}",
                        index + 1,
                        truncate(&item.label, 30),
                        tag,
                        truncate_line(&item.content, 40)
                    );
                }
                println!("\n{} note(s)", items.len());
            }
            OutputFormat::Json => {
                let rows: Vec<_> = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| ItemRow::new(index, item))
                    .collect();
                println!("{:#}", serde_json::json!(rows));
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.label);
                }
            }
        }
    }

    /// Print the result of a scan
    pub fn print_outcome(&self, outcome: &Outcome) {
        match self.format {
            OutputFormat::Human => match outcome {
                Outcome::Imported { .. }
                | Outcome::ImportUndone { .. }
                | Outcome::Exported { .. }
                | Outcome::Swapped { .. } => println!("✓ {}", outcome.message()),
                _ => println!("{}", outcome.message()),
            },
            OutputFormat::Json => {
                let mut value = serde_json::json!({
                    "status": outcome_status(outcome),
                    "message": outcome.message(),
                });
                match outcome {
                    Outcome::Imported { count } | Outcome::ImportUndone { count } => {
                        value["count"] = (*count).into()
                    }
                    Outcome::Exported { bytes } => value["bytes"] = (*bytes).into(),
                    Outcome::Swapped {
                        imported,
                        exported_bytes,
                    } => {
                        value["count"] = (*imported).into();
                        value["bytes"] = (*exported_bytes).into();
                    }
                    Outcome::Failed(e) => value["error"] = e.kind().into(),
                    _ => {}
                }
                println!("{}", value);
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warn(&self, msg: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", msg);
        }
    }
}

fn outcome_status(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Imported { .. } => "imported",
        Outcome::ImportUndone { .. } => "undone",
        Outcome::Exported { .. } => "exported",
        Outcome::Swapped { .. } => "swapped",
        Outcome::Empty => "empty",
        Outcome::AwaitingConfirmation { .. } => "pending",
        Outcome::Cancelled => "cancelled",
        Outcome::Failed(_) => "failed",
        Outcome::Ignored(_) => "ignored",
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagnotes_core::TagError;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        // Counts characters, not bytes
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(truncate_line("", 20), "");
    }

    #[test]
    fn test_rows_are_one_based() {
        let item = ListItem::new("Milk", "", "Groceries");
        let value = serde_json::json!(ItemRow::new(0, &item));
        assert_eq!(value["position"], 1);
        assert_eq!(value["tag"], "Groceries");
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(outcome_status(&Outcome::Empty), "empty");
        assert_eq!(
            outcome_status(&Outcome::ImportUndone { count: 1 }),
            "undone"
        );
        assert_eq!(
            outcome_status(&Outcome::Failed(TagError::NotWritable)),
            "failed"
        );
    }
}
