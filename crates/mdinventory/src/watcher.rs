//! Filesystem change watcher for `--watch`
//!
//! Subscribes to every task folder and re-runs the pipeline once per
//! qualifying event. The handler is the only consumer of the event channel,
//! so reruns never overlap; events arriving during a rerun queue up.

use crate::config::{resolve_under_root, Config};
use crate::error::Result;
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use tracing::{debug, error, info, warn};

/// Watches task folders and drives reruns
pub struct ChangeWatcher {
    /// File system watcher; dropping it closes the channel
    _watcher: RecommendedWatcher,
    /// Receiver for file system events
    event_rx: Receiver<notify::Result<Event>>,
    /// Folders subscribed successfully
    watched: Vec<PathBuf>,
    /// Generated index files, raw and canonical forms
    outputs: Vec<PathBuf>,
}

impl ChangeWatcher {
    /// Create the watcher and subscribe every folder referenced by `config`.
    ///
    /// # Errors
    /// Returns an error only if the notification backend cannot be created.
    /// Folders that cannot be subscribed are logged and skipped.
    pub fn new(root: &Path, config: &Config) -> Result<Self> {
        let (event_tx, event_rx) = channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = event_tx.send(res) {
                error!("Failed to send file watch event: {}", e);
            }
        })?;

        let mut watched = Vec::new();
        for folder in config.folders() {
            let folder_path = resolve_under_root(root, folder);
            match watcher.watch(&folder_path, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    debug!("Watching folder {}", folder_path.display());
                    watched.push(folder_path);
                }
                Err(e) => warn!("Error watching folder {}: {}", folder_path.display(), e),
            }
        }
        if watched.is_empty() {
            warn!("No task folder could be watched; no reruns will be triggered");
        }

        let mut outputs = Vec::new();
        for task in &config.tasks {
            let output = resolve_under_root(root, &task.output_file);
            if let Ok(canonical) = output.canonicalize() {
                outputs.push(canonical);
            }
            outputs.push(output);
        }

        Ok(Self {
            _watcher: watcher,
            event_rx,
            watched,
            outputs,
        })
    }

    /// Folders that were subscribed successfully
    pub fn watched_folders(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Create, content-modify, rename and remove events trigger a rerun.
    ///
    /// A rename into a folder counts as a create and a rename out of it as a
    /// remove, so moved notes and editors saving by rename are picked up.
    pub fn is_qualifying(event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::Create(_)
                | EventKind::Remove(_)
                | EventKind::Modify(ModifyKind::Data(_))
                | EventKind::Modify(ModifyKind::Any)
                | EventKind::Modify(ModifyKind::Name(
                    RenameMode::To | RenameMode::From | RenameMode::Both | RenameMode::Any
                ))
        )
    }

    fn is_output(&self, path: &Path) -> bool {
        if self.outputs.iter().any(|o| o == path) {
            return true;
        }
        path.canonicalize()
            .map(|canonical| self.outputs.contains(&canonical))
            .unwrap_or(false)
    }

    /// Path that justifies a rerun, if any.
    ///
    /// Events touching only generated index files are ignored so that
    /// writing an index into a watched folder does not retrigger itself.
    pub fn changed_path<'a>(&self, event: &'a Event) -> Option<&'a Path> {
        if !Self::is_qualifying(event) {
            return None;
        }
        event
            .paths
            .iter()
            .map(PathBuf::as_path)
            .find(|path| !self.is_output(path))
    }

    /// Block on the event channel, invoking `on_change` for each qualifying event.
    ///
    /// Runs until the process is terminated or the backend shuts down.
    pub fn run<F: FnMut()>(self, mut on_change: F) {
        info!("Watching for changes. Press Ctrl+C to exit.");

        self.dispatch(self.event_rx.iter(), &mut on_change);

        error!("File watch channel disconnected");
    }

    /// Feed `events` through the filter, returning how many reruns fired.
    fn dispatch<I, F>(&self, events: I, on_change: &mut F) -> usize
    where
        I: IntoIterator<Item = notify::Result<Event>>,
        F: FnMut(),
    {
        let mut reruns = 0;
        for message in events {
            match message {
                Ok(event) => {
                    if let Some(path) = self.changed_path(&event) {
                        info!("Modified file: {} - Re-running tasks.", path.display());
                        on_change();
                        reruns += 1;
                    }
                }
                Err(e) => error!("File watch error: {}", e),
            }
        }
        reruns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Task;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use std::fs;
    use tempfile::TempDir;

    fn config(folders: &[&str]) -> Config {
        Config {
            tasks: vec![Task {
                output_file: "notes/index.md".to_string(),
                template: None,
                folders: folders.iter().map(|s| s.to_string()).collect(),
                extensions: vec!["md".to_string()],
                tags: Vec::new(),
                format: None,
            }],
        }
    }

    fn event(kind: EventKind, path: PathBuf) -> Event {
        Event::new(kind).add_path(path)
    }

    #[test]
    fn test_watcher_subscribes_existing_folders() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("notes")).unwrap();

        let watcher = ChangeWatcher::new(temp.path(), &config(&["notes", "missing"])).unwrap();
        assert_eq!(watcher.watched_folders(), &[temp.path().join("notes")]);
    }

    #[test]
    fn test_watcher_starts_without_folders() {
        let temp = TempDir::new().unwrap();
        let watcher = ChangeWatcher::new(temp.path(), &config(&["missing"])).unwrap();
        assert!(watcher.watched_folders().is_empty());
    }

    #[test]
    fn test_qualifying_event_kinds() {
        let path = PathBuf::from("notes/a.md");
        assert!(ChangeWatcher::is_qualifying(&event(
            EventKind::Create(CreateKind::File),
            path.clone()
        )));
        assert!(ChangeWatcher::is_qualifying(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            path.clone()
        )));
        assert!(ChangeWatcher::is_qualifying(&event(
            EventKind::Remove(RemoveKind::File),
            path.clone()
        )));
        assert!(!ChangeWatcher::is_qualifying(&event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            path.clone()
        )));
        assert!(!ChangeWatcher::is_qualifying(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Other)),
            path.clone()
        )));
        assert!(!ChangeWatcher::is_qualifying(&event(
            EventKind::Access(notify::event::AccessKind::Any),
            path
        )));
    }

    #[test]
    fn test_output_file_events_ignored() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        fs::create_dir_all(&notes).unwrap();
        fs::write(notes.join("index.md"), "").unwrap();

        let watcher = ChangeWatcher::new(temp.path(), &config(&["notes"])).unwrap();
        let kind = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        let own_output = event(kind, notes.join("index.md"));
        assert_eq!(watcher.changed_path(&own_output), None);

        let note = event(kind, notes.join("a.md"));
        assert_eq!(watcher.changed_path(&note), Some(notes.join("a.md").as_path()));
    }

    #[test]
    fn test_renames_qualify() {
        let path = PathBuf::from("notes/a.md");
        for mode in [RenameMode::To, RenameMode::From, RenameMode::Both, RenameMode::Any] {
            assert!(
                ChangeWatcher::is_qualifying(&event(
                    EventKind::Modify(ModifyKind::Name(mode)),
                    path.clone()
                )),
                "rename mode {:?} should qualify",
                mode
            );
        }
    }

    #[test]
    fn test_note_moved_into_folder_triggers_rerun() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        fs::create_dir_all(&notes).unwrap();
        let watcher = ChangeWatcher::new(temp.path(), &config(&["notes"])).unwrap();

        let moved = event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), notes.join("a.md"));
        assert_eq!(watcher.changed_path(&moved), Some(notes.join("a.md").as_path()));
    }

    #[test]
    fn test_dispatch_reruns_once_per_qualifying_event() {
        let temp = TempDir::new().unwrap();
        let notes = temp.path().join("notes");
        fs::create_dir_all(&notes).unwrap();
        let watcher = ChangeWatcher::new(temp.path(), &config(&["notes"])).unwrap();

        let content = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        let events = vec![
            Ok(event(EventKind::Create(CreateKind::File), notes.join("a.md"))),
            Ok(event(
                EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
                notes.join("a.md"),
            )),
            Ok(event(content, notes.join("index.md"))),
            Err(notify::Error::generic("backend hiccup")),
            Ok(event(content, notes.join("a.md"))),
            Ok(event(EventKind::Remove(RemoveKind::File), notes.join("b.md"))),
        ];

        let mut calls = 0;
        let reruns = watcher.dispatch(events, &mut || calls += 1);

        assert_eq!(reruns, 3);
        assert_eq!(calls, 3);
    }
}
