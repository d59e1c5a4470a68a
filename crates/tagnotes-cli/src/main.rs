//! tagnotes CLI
//!
//! Command-line interface for tagnotes - a note list you carry on an NFC tag.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagnotes_core::{welcome_item, Config, FilePersistence, ListStore};

mod commands;
mod editor;
mod output;

use commands::item::ItemFields;
use commands::scan::ScanArgs;
use commands::sort::SortKey;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "tagnotes")]
#[command(about = "tagnotes - A note list you carry on an NFC tag")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes
    #[command(alias = "ls")]
    List,
    /// Show one note
    Show {
        /// Position in the list (1 is the front)
        position: usize,
        /// Print the note as share text
        #[arg(long)]
        share: bool,
    },
    /// Add a note at the front of the list
    Add {
        /// Note label
        label: String,
        /// Note content
        #[arg(short, long)]
        content: Option<String>,
        /// Tag label
        #[arg(short, long)]
        tag: Option<String>,
        /// Add at the back instead
        #[arg(long)]
        back: bool,
    },
    /// Insert a note at a position
    Insert {
        /// Position the note will have (1 is the front)
        position: usize,
        /// Note label
        label: String,
        /// Note content
        #[arg(short, long)]
        content: Option<String>,
        /// Tag label
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Edit a note (opens $EDITOR when no field is given)
    Edit {
        /// Position in the list
        position: usize,
        /// New label
        #[arg(short, long)]
        label: Option<String>,
        /// New content
        #[arg(short, long)]
        content: Option<String>,
        /// New tag label
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Remove a note
    #[command(alias = "rm")]
    Remove {
        /// Position in the list
        position: usize,
    },
    /// Move a note to another position
    #[command(alias = "mv")]
    Move {
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },
    /// Send a note to the front (or the first note to the back)
    Bump {
        /// Position in the list
        position: usize,
    },
    /// Sort the list
    Sort {
        /// Sort order
        #[arg(value_enum)]
        key: SortKey,
    },
    /// Remove every note
    Clear {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Scan a tag: import its notes, or write/swap with --write/--swap
    Scan {
        /// Write the local list to the tag
        #[arg(long, conflicts_with = "swap")]
        write: bool,
        /// Swap the local list with the tag's notes
        #[arg(long)]
        swap: bool,
        /// Tag image to scan (defaults to the configured tag)
        #[arg(long)]
        tag: Option<PathBuf>,
        /// Import without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Take back the last import from a tag
    UndoImport,
    /// Manage file-backed tags
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },
    /// Show list size and tag fit
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum TagCommands {
    /// Format a blank tag
    Init {
        /// Tag image path (defaults to the configured tag)
        path: Option<PathBuf>,
        /// Usable bytes on the tag
        #[arg(long, default_value_t = commands::tag::DEFAULT_CAPACITY)]
        capacity: usize,
        /// Make the tag read-only
        #[arg(long)]
        read_only: bool,
        /// Wipe an existing tag
        #[arg(long)]
        force: bool,
    },
    /// Show what a tag holds
    Inspect {
        /// Tag image path (defaults to the configured tag)
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, tag_path, record_type, seed_welcome, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even when the config itself is broken
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    // Tag commands don't touch the list
    if let Commands::Tag { command } = cli.command {
        return match command {
            TagCommands::Init {
                path,
                capacity,
                read_only,
                force,
            } => commands::tag::init(path, &config, capacity, read_only, force, &output),
            TagCommands::Inspect { path } => commands::tag::inspect(path, &config, &output),
        };
    }

    let persistence = FilePersistence::new(&config);
    let seed = if config.seed_welcome {
        vec![welcome_item()]
    } else {
        Vec::new()
    };
    let mut store = match ListStore::open_or_seed(persistence, seed) {
        Ok(store) => store,
        Err(e) => match e.recovery_suggestion() {
            Some(suggestion) => bail!("{}\n{}", e, suggestion),
            None => return Err(e.into()),
        },
    };

    match cli.command {
        Commands::List => commands::item::list(&store, &output)?,
        Commands::Show { position, share } => {
            commands::item::show(&store, position, share, &output)?
        }
        Commands::Add {
            label,
            content,
            tag,
            back,
        } => {
            let fields = ItemFields {
                label: Some(label),
                content,
                tag,
            };
            commands::item::add(&mut store, fields, back, &output)?
        }
        Commands::Insert {
            position,
            label,
            content,
            tag,
        } => {
            let fields = ItemFields {
                label: Some(label),
                content,
                tag,
            };
            commands::item::insert(&mut store, position, fields, &output)?
        }
        Commands::Edit {
            position,
            label,
            content,
            tag,
        } => {
            let fields = ItemFields {
                label,
                content,
                tag,
            };
            commands::item::edit(&mut store, position, fields, &output)?
        }
        Commands::Remove { position } => commands::item::remove(&mut store, position, &output)?,
        Commands::Move { from, to } => commands::item::move_note(&mut store, from, to, &output)?,
        Commands::Bump { position } => commands::item::bump(&mut store, position, &output)?,
        Commands::Sort { key } => commands::sort::sort(&mut store, key, &output)?,
        Commands::Clear { yes } => commands::item::clear(&mut store, yes, &output)?,
        Commands::Scan {
            write,
            swap,
            tag,
            yes,
        } => {
            let args = ScanArgs {
                write,
                swap,
                tag,
                yes,
            };
            store = commands::scan::scan(store, &config, args, &output)?;
        }
        Commands::UndoImport => {
            store = commands::scan::undo_import(store, &config, &output)?;
        }
        Commands::Status => commands::status::show(&store, &config, &output)?,
        Commands::Tag { .. } => unreachable!(),    // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
    }

    if store.failed_saves() > 0 {
        output.warn(&format!(
            "Changes could not be saved to {}. They are lost when this command exits.",
            store.persistence().path().display()
        ));
    }

    Ok(())
}

/// Install a tracing subscriber when TAGNOTES_LOG is set
///
/// Logs go to `log_file` from the config, or to stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TAGNOTES_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "tagnotes_core={},tagnotes_cli={}",
        log_level, log_level
    ));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);

    // Ignore the error if a subscriber is already installed
    match config.log_file {
        Some(ref log_path) => match File::create(log_path) {
            Ok(log_file) => {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(log_file))
                    .try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            }
        },
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
