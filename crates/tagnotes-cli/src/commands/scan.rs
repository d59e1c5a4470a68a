//! Scan command handler
//!
//! Each invocation is one scan of the file-backed tag: the mode is chosen by
//! flags, consumed by the scan, and gone when the command exits.
//!
//! An accepted import leaves an undo record in the data directory for
//! `tagnotes undo-import`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use tagnotes_core::{
    CapacityGuard, Config, FileTag, FileTagScan, IgnoreReason, ImportDecision, ImportUndo,
    ListItem, ListStore, Outcome, Persistence, Presenter, SyncController,
};

use crate::editor::confirm;
use crate::output::Output;

/// Options for one scan
pub struct ScanArgs {
    /// Copy the local list onto the tag
    pub write: bool,
    /// Swap the local list with the tag's notes
    pub swap: bool,
    /// Tag image to scan instead of the configured one
    pub tag: Option<PathBuf>,
    /// Import without asking
    pub yes: bool,
}

/// Presents scan results on the terminal
struct CliPresenter<'a> {
    output: &'a Output,
    assume_yes: bool,
}

impl Presenter for CliPresenter<'_> {
    fn notify(&mut self, outcome: &Outcome) {
        // Failures and ignored scans are reported as command errors
        if !outcome.is_failure() && !matches!(outcome, Outcome::Ignored(_)) {
            self.output.print_outcome(outcome);
        }
    }

    fn confirm_import(&mut self, items: &[ListItem]) -> ImportDecision {
        if self.assume_yes {
            return ImportDecision::Accept;
        }
        if !self.output.should_prompt() {
            self.output.message("Pass --yes to import without a prompt.");
            return ImportDecision::Cancel;
        }

        self.output.print_items(items);
        match confirm(&format!("Import {} note(s) from the tag?", items.len())) {
            Ok(true) => ImportDecision::Accept,
            Ok(false) => ImportDecision::Cancel,
            Err(e) => {
                warn!("Import prompt failed: {}", e);
                ImportDecision::Cancel
            }
        }
    }
}

/// Scan a tag: import by default, or write/swap when asked
///
/// Hands the store back so the caller can check on its saves.
pub fn scan<P: Persistence>(
    store: ListStore<P>,
    config: &Config,
    args: ScanArgs,
    output: &Output,
) -> Result<ListStore<P>> {
    let guard = CapacityGuard::new(config.record_type.clone());
    let mut transport = FileTag::new(guard.clone());
    let mut controller = SyncController::new(store, guard);

    if args.write {
        controller.request_write()?;
    } else if args.swap {
        controller.request_swap()?;
    }

    let tag_path = args.tag.unwrap_or_else(|| config.tag_path());
    let event = FileTagScan::new(&tag_path);
    let mut presenter = CliPresenter {
        output,
        assume_yes: args.yes,
    };

    info!("Scanning {} in {} mode", tag_path.display(), controller.mode());
    let outcome = controller.handle_scan(&mut transport, &event, &mut presenter);

    match outcome {
        Outcome::Failed(e) => bail!("{}\n{}", e, e.recovery_suggestion()),
        Outcome::Ignored(IgnoreReason::NotAScan) => bail!(
            "No tag at {}. Create one with:\n  tagnotes tag init {}",
            tag_path.display(),
            tag_path.display()
        ),
        _ => {
            if outcome.changed_local() && output.should_prompt() {
                println!();
                output.print_items(controller.store().items());
            }
            record_undo(&controller, &outcome, config, output);
            Ok(controller.into_store())
        }
    }
}

/// Keep the undo record in step with what the scan did
///
/// A failure here only costs the undo, so it is reported as a warning.
fn record_undo<P: Persistence>(
    controller: &SyncController<P>,
    outcome: &Outcome,
    config: &Config,
    output: &Output,
) {
    let path = config.import_undo_path();
    let result = match (outcome, controller.last_import()) {
        (Outcome::Imported { .. }, Some(undo)) => {
            let saved = undo.save(&path);
            if saved.is_ok() && output.should_prompt() {
                output.message("Undo with: tagnotes undo-import");
            }
            saved
        }
        (Outcome::Swapped { .. }, _) => ImportUndo::discard(&path),
        _ => Ok(()),
    };

    if let Err(e) = result {
        warn!("Import undo record not updated: {:#}", e);
        output.warn("The import cannot be undone later.");
    }
}

/// Take back the last import
///
/// Refused once the list has changed since the import. The record is used
/// up either way.
pub fn undo_import<P: Persistence>(
    store: ListStore<P>,
    config: &Config,
    output: &Output,
) -> Result<ListStore<P>> {
    let path = config.import_undo_path();
    let undo = ImportUndo::load(&path).context("Failed to read the import undo record")?;

    let mut controller = SyncController::new(store, CapacityGuard::new(config.record_type.clone()));
    if let Some(undo) = undo {
        controller.restore_last_import(undo);
    }

    let mut presenter = CliPresenter {
        output,
        assume_yes: false,
    };
    let outcome = controller.undo_import(&mut presenter);
    ImportUndo::discard(&path)?;

    match outcome {
        Outcome::Ignored(_) => bail!("{}", outcome.message()),
        _ => Ok(controller.into_store()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tagnotes_core::{codec, MemoryPersistence, TagImage, TagTransport};
    use tempfile::TempDir;

    fn setup(temp_dir: &TempDir, tag_items: &[ListItem]) -> (Config, PathBuf) {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let tag_path = config.tag_path();
        FileTag::format(&tag_path, Some(504), true).unwrap();
        if !tag_items.is_empty() {
            FileTag::default()
                .write_payload(&FileTagScan::new(&tag_path), &codec::encode(tag_items))
                .unwrap();
        }
        (config, tag_path)
    }

    fn store_with(labels: &[&str]) -> ListStore<MemoryPersistence> {
        let mut store = ListStore::open(MemoryPersistence::new()).unwrap();
        store.add_all_to_back(labels.iter().map(|l| ListItem::with_label(*l)));
        store
    }

    fn args(write: bool, swap: bool, yes: bool) -> ScanArgs {
        ScanArgs {
            write,
            swap,
            tag: None,
            yes,
        }
    }

    #[test]
    fn test_import_with_yes() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let store =
            scan(store_with(&["Local"]), &config, args(false, false, true), &output).unwrap();

        let labels: Vec<_> = store.items().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["Tag item", "Local"]);
    }

    #[test]
    fn test_import_without_yes_is_cancelled_when_not_prompting() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let store =
            scan(store_with(&["Local"]), &config, args(false, false, false), &output).unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_and_swap() {
        let temp_dir = TempDir::new().unwrap();
        let (config, tag_path) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let store =
            scan(store_with(&["Local"]), &config, args(false, true, false), &output).unwrap();
        assert_eq!(store.items(), &[ListItem::with_label("Tag item")]);

        let store = scan(store, &config, args(true, false, false), &output).unwrap();
        assert_eq!(store.items(), &[ListItem::with_label("Tag item")]);

        let image = TagImage::load(&tag_path).unwrap();
        assert_eq!(
            codec::decode(&image.payload_bytes().unwrap()),
            vec![ListItem::with_label("Tag item")]
        );
    }

    #[test]
    fn test_missing_tag_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let output = Output::new(OutputFormat::Quiet);

        let err = scan(store_with(&[]), &config, args(true, false, false), &output).unwrap_err();
        assert!(err.to_string().contains("tagnotes tag init"));
    }

    fn labels(store: &ListStore<MemoryPersistence>) -> Vec<&str> {
        store.items().iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_undo_import_restores_list() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let store =
            scan(store_with(&["Local"]), &config, args(false, false, true), &output).unwrap();
        assert_eq!(labels(&store), vec!["Tag item", "Local"]);
        assert!(config.import_undo_path().exists());

        let store = undo_import(store, &config, &output).unwrap();
        assert_eq!(labels(&store), vec!["Local"]);
        assert!(!config.import_undo_path().exists());

        assert!(undo_import(store, &config, &output).is_err());
    }

    #[test]
    fn test_undo_import_refused_after_edit() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let mut store =
            scan(store_with(&["Local"]), &config, args(false, false, true), &output).unwrap();
        store.add(ListItem::with_label("Later"));

        let err = undo_import(store, &config, &output).unwrap_err();
        assert!(err.to_string().contains("changed since the import"));
        assert!(!config.import_undo_path().exists());
    }

    #[test]
    fn test_swap_discards_undo_record() {
        let temp_dir = TempDir::new().unwrap();
        let (config, _) = setup(&temp_dir, &[ListItem::with_label("Tag item")]);
        let output = Output::new(OutputFormat::Quiet);

        let store =
            scan(store_with(&["Local"]), &config, args(false, false, true), &output).unwrap();
        assert!(config.import_undo_path().exists());

        scan(store, &config, args(false, true, false), &output).unwrap();
        assert!(!config.import_undo_path().exists());
    }
}
