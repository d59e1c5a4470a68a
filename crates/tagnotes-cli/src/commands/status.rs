//! Status command handler

use anyhow::Result;

use tagnotes_core::{CapacityGuard, Config, ListStore, Persistence, TagImage};

use crate::output::{Output, OutputFormat};

/// Show the list's size and whether it fits on the configured tag
pub fn show<P: Persistence>(store: &ListStore<P>, config: &Config, output: &Output) -> Result<()> {
    let guard = CapacityGuard::new(config.record_type.clone());
    let payload = store.payload();
    let framed = guard.framed_len(payload.len());

    let tag_path = config.tag_path();
    // A missing or unreadable tag only means there is nothing to compare against
    let tag = TagImage::load(&tag_path).ok();
    let capacity = tag.as_ref().and_then(|image| image.capacity);
    let fits = tag.as_ref().map(|_| guard.fits(&payload, capacity));

    match output.format {
        OutputFormat::Json => {
            println!(
                "{:#}",
                serde_json::json!({
                    "notes": store.len(),
                    "payload_bytes": payload.len(),
                    "framed_bytes": framed,
                    "data_dir": config.data_dir,
                    "tag": {
                        "path": tag_path,
                        "present": tag.is_some(),
                        "capacity": capacity,
                        "fits": fits,
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("tagnotes Status");
            println!("===============");
            println!();
            println!("List:");
            println!("  Notes:    {}", store.len());
            println!("  Size:     {} bytes ({} on a tag)", payload.len(), framed);
            println!("  Location: {}", config.data_dir.display());
            println!();
            println!("Tag:");
            println!("  Path:     {}", tag_path.display());
            match (&tag, capacity) {
                (None, _) => println!("  Status:   not present"),
                (Some(_), None) => println!("  Capacity: unknown"),
                (Some(_), Some(capacity)) => {
                    println!("  Capacity: {} bytes", capacity);
                    match guard.remaining(&payload, capacity) {
                        Some(left) => println!("  Fits:     yes ({} bytes to spare)", left),
                        None => println!(
                            "  Fits:     no ({} bytes over)",
                            framed.saturating_sub(capacity)
                        ),
                    }
                }
            }
        }
    }

    Ok(())
}
