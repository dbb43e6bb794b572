use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace};

/// Watches a single todo.txt file for changes on disk.
///
/// The parent directory is watched (editors and atomic writes replace the
/// file rather than modifying it in place) and events are filtered down to
/// the list's file name.
pub struct TodoWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<()>,
}

impl TodoWatcher {
    pub fn start(file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let file_name: Option<OsString> = file.file_name().map(|n| n.to_os_string());
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if relevant {
                    trace!(kind = ?event.kind, "todo list changed");
                    let _ = tx.send(());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watching for changes");
        Ok(TodoWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Block until the file changes, then keep absorbing events until it
    /// has been quiet for `debounce`, so the caller reads a settled file.
    /// Returns `false` once the watcher has shut down.
    pub fn wait_settled(&self, debounce: Duration) -> bool {
        if self.rx.recv().is_err() {
            return false;
        }
        let mut coalesced = 1usize;
        loop {
            match self.rx.recv_timeout(debounce) {
                Ok(()) => coalesced += 1,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        debug!(events = coalesced, "change settled");
        true
    }
}
