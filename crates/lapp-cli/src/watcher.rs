//! File watcher with debouncing for `post-build --watch`.
//!
//! Watches the directory that holds the metadata file and forwards changes
//! to that one file. Editors often replace files instead of writing them in
//! place, so watching the file itself would lose track after the first save.
//!
//! Debouncing is trailing-edge: a burst of events is reported once the file
//! has been quiet for the whole window, so the rebuild always reads the last
//! save of the burst.

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

/// Watches a single file and reports debounced changes.
pub struct FileWatcher {
    /// Underlying notify watcher, kept alive for the lifetime of the watch
    _watcher: RecommendedWatcher,
    target: PathBuf,
}

impl FileWatcher {
    /// Start watching `target`.
    ///
    /// # Arguments
    ///
    /// * `target` - File to watch; its parent directory must exist
    /// * `debounce_ms` - Quiet period that ends a burst of changes
    ///
    /// # Returns
    ///
    /// Tuple of (FileWatcher, debounced change stream). Events for other
    /// files in the same directory are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the parent directory is missing or the watcher
    /// cannot be created
    pub fn new(target: PathBuf, debounce_ms: u64) -> Result<(Self, Changes)> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            return Err(CliError::FileNotFound(dir));
        }

        let (tx, rx) = mpsc::channel(16);
        let watched = target.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else {
                return;
            };
            if !is_relevant(&event, &watched) {
                return;
            }

            // A full channel still has events queued, which restart the window anyway
            let _ = tx.try_send(());
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!("watching {}", target.display());

        Ok((
            Self {
                _watcher: watcher,
                target,
            },
            Changes::new(rx, Duration::from_millis(debounce_ms)),
        ))
    }

    /// The file being watched.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

/// Debounced stream of change notifications
#[derive(Debug)]
pub struct Changes {
    rx: mpsc::Receiver<()>,
    quiet: Duration,
}

impl Changes {
    /// Wrap a raw event channel; a burst ends after `quiet` without events
    pub fn new(rx: mpsc::Receiver<()>, quiet: Duration) -> Self {
        Self { rx, quiet }
    }

    /// Wait until a burst of changes has settled.
    ///
    /// Every event inside the window restarts it. Returns `None` once the
    /// watcher is gone and nothing is pending.
    pub async fn next(&mut self) -> Option<()> {
        self.rx.recv().await?;
        loop {
            match tokio::time::timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) | Err(_) => return Some(()),
            }
        }
    }
}

fn is_relevant(event: &Event, target: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    // Only the target's directory is watched, so the file name identifies it
    kind_matches
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == target.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::time::Instant;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_modification_of_target_is_relevant() {
        let target = PathBuf::from("/project/lapp-meta.json");
        let ev = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/project/lapp-meta.json",
        );
        assert!(is_relevant(&ev, &target));
    }

    #[test]
    fn test_other_files_are_ignored() {
        let target = PathBuf::from("/project/lapp-meta.json");
        let ev = event(EventKind::Create(CreateKind::File), "/project/package.json");
        assert!(!is_relevant(&ev, &target));
    }

    #[test]
    fn test_access_events_are_ignored() {
        let target = PathBuf::from("/project/lapp-meta.json");
        let ev = event(
            EventKind::Access(notify::event::AccessKind::Any),
            "/project/lapp-meta.json",
        );
        assert!(!is_relevant(&ev, &target));
    }

    #[test]
    fn test_missing_directory() {
        let result = FileWatcher::new(PathBuf::from("/definitely/not/here/lapp-meta.json"), 100);
        assert!(matches!(result, Err(CliError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_burst_collapses_into_one_change() {
        let (tx, rx) = mpsc::channel(16);
        let mut changes = Changes::new(rx, Duration::from_millis(50));

        for _ in 0..3 {
            tx.send(()).await.unwrap();
        }

        assert_eq!(changes.next().await, Some(()));
        let again = tokio::time::timeout(Duration::from_millis(200), changes.next()).await;
        assert!(again.is_err(), "a single burst must not report twice");
    }

    #[tokio::test]
    async fn test_late_event_extends_the_window() {
        let (tx, rx) = mpsc::channel(16);
        let mut changes = Changes::new(rx, Duration::from_millis(200));

        tx.send(()).await.unwrap();
        let start = Instant::now();
        let late = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            late.send(()).await.unwrap();
        });

        assert_eq!(changes.next().await, Some(()));
        assert!(start.elapsed() >= Duration::from_millis(220));
    }

    #[tokio::test]
    async fn test_closed_channel_flushes_then_ends() {
        let (tx, rx) = mpsc::channel(16);
        let mut changes = Changes::new(rx, Duration::from_millis(50));

        tx.send(()).await.unwrap();
        drop(tx);

        assert_eq!(changes.next().await, Some(()));
        assert_eq!(changes.next().await, None);
    }

    #[tokio::test]
    async fn test_save_right_after_a_rebuild_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let target = temp.path().join("lapp-meta.json");
        std::fs::write(&target, r#"{"v":0}"#).unwrap();

        let (_watcher, mut changes) = FileWatcher::new(target.clone(), 100).unwrap();
        let wait = Duration::from_secs(5);

        std::fs::write(&target, r#"{"v":1}"#).unwrap();
        let first = tokio::time::timeout(wait, changes.next()).await;
        assert_eq!(first.ok().flatten(), Some(()));

        // Lands well inside the old debounce window
        std::fs::write(&target, r#"{"v":2}"#).unwrap();
        let second = tokio::time::timeout(wait, changes.next()).await;
        assert_eq!(second.ok().flatten(), Some(()));
        assert_eq!(std::fs::read_to_string(&target).unwrap(), r#"{"v":2}"#);
    }
}
