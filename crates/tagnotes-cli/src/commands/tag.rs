//! Tag command handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use tagnotes_core::{codec, CapacityGuard, Config, FileTag, TagImage};

use crate::output::{Output, OutputFormat};

/// Usable bytes of an NTAG215, the most common sticker tag
pub const DEFAULT_CAPACITY: usize = 504;

/// Format a file-backed tag
pub fn init(
    path: Option<PathBuf>,
    config: &Config,
    capacity: usize,
    read_only: bool,
    force: bool,
    output: &Output,
) -> Result<()> {
    let path = path.unwrap_or_else(|| config.tag_path());

    if path.exists() && !force {
        bail!(
            "A tag already exists at {}. Pass --force to wipe it.",
            path.display()
        );
    }

    FileTag::format(&path, Some(capacity), !read_only)?;

    output.success(&format!(
        "Formatted {}-byte{} tag at {}",
        capacity,
        if read_only { " read-only" } else { "" },
        path.display()
    ));
    Ok(())
}

/// Show what a tag holds
pub fn inspect(path: Option<PathBuf>, config: &Config, output: &Output) -> Result<()> {
    let path = path.unwrap_or_else(|| config.tag_path());
    let image = load_image(&path)?;
    let payload = image
        .payload_bytes()
        .context("Tag payload is not valid base64")?;
    let items = codec::decode(&payload);
    let used = if payload.is_empty() {
        0
    } else {
        CapacityGuard::new(config.record_type.clone()).framed_len(payload.len())
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{:#}",
                serde_json::json!({
                    "path": path,
                    "capacity": image.capacity,
                    "writable": image.writable,
                    "record_type": image.record_type,
                    "payload_bytes": payload.len(),
                    "used_bytes": used,
                    "written_at": image.written_at,
                    "items": items,
                })
            );
        }
        OutputFormat::Quiet => {
            for item in &items {
                println!("{}", item.label);
            }
        }
        OutputFormat::Human => {
            println!("Tag: {}", path.display());
            match image.capacity {
                Some(capacity) => println!("  Used:     {} of {} bytes", used, capacity),
                None => println!("  Used:     {} bytes (capacity unknown)", used),
            }
            println!(
                "  Writable: {}",
                if image.writable { "yes" } else { "no" }
            );
            if let Some(ref record_type) = image.record_type {
                println!("  Record:   {}", record_type);
            }
            if let Some(written_at) = image.written_at {
                println!("  Written:  {}", written_at.format("%Y-%m-%d %H:%M"));
            }
            println!();
            output.print_items(&items);
        }
    }

    Ok(())
}

fn load_image(path: &Path) -> Result<TagImage> {
    if !path.exists() {
        bail!(
            "No tag at {}. Create one with:\n  tagnotes tag init {}",
            path.display(),
            path.display()
        );
    }
    TagImage::load(path)
}
