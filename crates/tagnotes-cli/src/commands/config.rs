//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tagnotes_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "tag_path": config.tag_path,
                    "record_type": config.record_type,
                    "seed_welcome": config.seed_welcome,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:     {}", config.data_dir.display());
            println!(
                "  tag_path:     {}",
                config
                    .tag_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| format!("(not set, using {})", config.tag_path().display()))
            );
            println!("  record_type:  {}", config.record_type);
            println!("  seed_welcome: {}", config.seed_welcome);
            println!(
                "  log_file:     {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "tag_path" => {
            config.tag_path = optional(value).map(PathBuf::from);
        }
        "record_type" => {
            if value.is_empty() || !value.contains('/') {
                bail!("record_type must be a MIME type, e.g. application/x-tagnotes");
            }
            config.record_type = value.to_string();
        }
        "seed_welcome" => {
            config.seed_welcome = value
                .parse()
                .context("Invalid value for seed_welcome. Use 'true' or 'false'.")?;
        }
        "log_file" => {
            config.log_file = optional(value).map(PathBuf::from);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, tag_path, record_type, seed_welcome, log_file",
                key
            );
        }
    }
    Ok(())
}

/// Empty or "none" unsets an optional value
fn optional(value: &str) -> Option<&str> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "tag_path", "/tmp/tag.json").unwrap();
        assert_eq!(config.tag_path, Some(PathBuf::from("/tmp/tag.json")));
        apply(&mut config, "tag_path", "none").unwrap();
        assert_eq!(config.tag_path, None);

        apply(&mut config, "seed_welcome", "false").unwrap();
        assert!(!config.seed_welcome);

        apply(&mut config, "record_type", "text/plain").unwrap();
        assert_eq!(config.record_type, "text/plain");
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply(&mut config, "seed_welcome", "maybe").is_err());
        assert!(apply(&mut config, "record_type", "plain").is_err());
        assert!(apply(&mut config, "sync_url", "ws://x").is_err());
    }
}
