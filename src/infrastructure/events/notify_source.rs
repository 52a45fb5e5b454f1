//! notify-backed event source
//!
//! Watches the root recursively with the platform's recommended watcher and
//! translates `notify` events into `FsNotification`s. Translation runs on
//! notify's own thread; the only thing it touches is the queue sink.

use std::path::PathBuf;

use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::domain::ports::{EventSource, FsNotification, NotificationSink};
use crate::error::{MicrosyncError, MicrosyncResult};

/// Event source for a real directory tree
pub struct NotifyEventSource {
    root: PathBuf,
    watcher: Option<RecommendedWatcher>,
}

impl NotifyEventSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            watcher: None,
        }
    }
}

impl EventSource for NotifyEventSource {
    fn start(&mut self, sink: NotificationSink) -> MicrosyncResult<()> {
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for notification in translate_event(&event) {
                        if !sink.send(notification) {
                            return;
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "file watcher reported an error"),
            },
            Config::default(),
        )
        .map_err(|e| MicrosyncError::Watcher(e.to_string()))?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| MicrosyncError::Watcher(e.to_string()))?;

        tracing::debug!(root = %self.root.display(), "file watcher attached");
        self.watcher = Some(watcher);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.root);
            tracing::debug!(root = %self.root.display(), "file watcher detached");
        }
    }
}

impl Drop for NotifyEventSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Map one `notify` event to zero or more notifications
///
/// Folder creation/removal, access and metadata-only events carry no file
/// content and are dropped. A rename reported as a single event becomes
/// `Moved`; a lone rename-to becomes `Created`; a lone rename-from is
/// dropped, since moves only ever act on their destination.
pub fn translate_event(event: &Event) -> Vec<FsNotification> {
    let each = |make: fn(PathBuf) -> FsNotification| -> Vec<FsNotification> {
        event.paths.iter().cloned().map(make).collect()
    };

    match event.kind {
        EventKind::Create(CreateKind::Folder) => Vec::new(),
        EventKind::Create(_) => each(|path| FsNotification::Created { path }),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to, ..] => vec![FsNotification::Moved {
                from: from.clone(),
                to: to.clone(),
            }],
            [to] => vec![FsNotification::Created { path: to.clone() }],
            [] => Vec::new(),
        },
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            each(|path| FsNotification::Created { path })
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => Vec::new(),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => each(|path| FsNotification::Modified { path }),
        EventKind::Remove(RemoveKind::Folder) => Vec::new(),
        EventKind::Remove(_) => each(|path| FsNotification::Deleted { path }),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}
