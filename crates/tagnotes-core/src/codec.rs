//! Payload codec
//!
//! Serializes an ordered list of notes into the single byte buffer stored on
//! a tag and in local persistence.
//!
//! ## Format
//!
//! ```text
//! payload := item (DIVIDER item)*        | empty
//! item    := label SEPARATOR content SEPARATOR tag
//! ```
//!
//! - `DIVIDER` is U+001E (record separator)
//! - `SEPARATOR` is U+001F (unit separator)
//! - `ESCAPE` is U+001B; inside a field it precedes any of the three
//!   reserved characters
//!
//! The buffer is UTF-8. An empty list encodes to an empty buffer, which is
//! distinct from a list holding one blank note (`"\u{1F}\u{1F}"`).
//!
//! Decoding never fails. Missing trailing fields decode as empty strings,
//! extra separators are kept in the tag, and invalid UTF-8 is replaced.

use crate::models::ListItem;

/// Separates items within a payload
pub const DIVIDER: char = '\u{1E}';

/// Separates the fields of one item
pub const SEPARATOR: char = '\u{1F}';

/// Marks the next character as literal field text
pub const ESCAPE: char = '\u{1B}';

const FIELD_COUNT: usize = 3;

/// Check whether a character must be escaped inside a field
pub fn is_reserved(c: char) -> bool {
    matches!(c, DIVIDER | SEPARATOR | ESCAPE)
}

/// Encode a list of notes into a payload
pub fn encode(items: &[ListItem]) -> Vec<u8> {
    let mut out = String::with_capacity(encoded_len(items));

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push(DIVIDER);
        }
        push_escaped(&mut out, &item.label);
        out.push(SEPARATOR);
        push_escaped(&mut out, &item.content);
        out.push(SEPARATOR);
        push_escaped(&mut out, &item.tag);
    }

    out.into_bytes()
}

/// Length in bytes of `encode(items)` without building the payload
pub fn encoded_len(items: &[ListItem]) -> usize {
    if items.is_empty() {
        return 0;
    }

    let dividers = items.len() - 1;
    let bodies: usize = items
        .iter()
        .map(|item| {
            escaped_len(&item.label)
                + escaped_len(&item.content)
                + escaped_len(&item.tag)
                + (FIELD_COUNT - 1)
        })
        .sum();

    bodies + dividers
}

/// Decode a payload into a list of notes
pub fn decode(payload: &[u8]) -> Vec<ListItem> {
    if payload.is_empty() {
        return Vec::new();
    }

    let text = String::from_utf8_lossy(payload);
    let mut items = Vec::new();
    let mut current = ItemBuilder::default();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(next) if is_reserved(next) => current.push(next),
                Some(next) => {
                    current.push(ESCAPE);
                    current.push(next);
                }
                None => current.push(ESCAPE),
            },
            DIVIDER => items.push(std::mem::take(&mut current).finish()),
            SEPARATOR => current.next_field(),
            _ => current.push(c),
        }
    }
    items.push(current.finish());

    items
}

fn push_escaped(out: &mut String, field: &str) {
    for c in field.chars() {
        if is_reserved(c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
}

// Every reserved character is one byte in UTF-8, as is its escape.
fn escaped_len(field: &str) -> usize {
    field.len() + field.chars().filter(|c| is_reserved(*c)).count()
}

#[derive(Default)]
struct ItemBuilder {
    fields: [String; FIELD_COUNT],
    index: usize,
}

impl ItemBuilder {
    fn push(&mut self, c: char) {
        self.fields[self.index].push(c);
    }

    fn next_field(&mut self) {
        if self.index + 1 < FIELD_COUNT {
            self.index += 1;
        } else {
            // Split into at most three parts; the rest belongs to the tag.
            self.fields[self.index].push(SEPARATOR);
        }
    }

    fn finish(self) -> ListItem {
        let [label, content, tag] = self.fields;
        ListItem {
            label,
            content,
            tag,
        }
    }
}
