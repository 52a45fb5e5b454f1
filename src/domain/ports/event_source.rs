//! Event Source Port
//!
//! A filesystem-event source watches a root recursively and pushes typed
//! notifications into the queue drained by the debounce loop. Sources run on
//! their own threads; the loop is the only consumer.

use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crate::error::MicrosyncResult;

/// A raw change notification from the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNotification {
    /// A file was created at `path`
    Created { path: PathBuf },
    /// A file's content changed
    Modified { path: PathBuf },
    /// A file was renamed from `from` to `to`
    Moved { from: PathBuf, to: PathBuf },
    /// A file was removed
    Deleted { path: PathBuf },
}

impl FsNotification {
    /// The path the change applies to (destination for moves)
    pub fn path(&self) -> &PathBuf {
        match self {
            FsNotification::Created { path }
            | FsNotification::Modified { path }
            | FsNotification::Deleted { path } => path,
            FsNotification::Moved { to, .. } => to,
        }
    }
}

/// Message carried by the loop's queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    Notification(FsNotification),
    /// Nudge a loop blocked without a deadline so it re-checks its stop flag
    Wake,
}

/// Producer half of the loop's queue, handed to event sources
#[derive(Debug, Clone)]
pub struct NotificationSink {
    tx: Sender<WatchSignal>,
}

impl NotificationSink {
    pub fn new(tx: Sender<WatchSignal>) -> Self {
        Self { tx }
    }

    /// Queue a notification; returns `false` once the loop has gone away
    pub fn send(&self, notification: FsNotification) -> bool {
        self.tx.send(WatchSignal::Notification(notification)).is_ok()
    }

    pub(crate) fn wake(&self) {
        let _ = self.tx.send(WatchSignal::Wake);
    }
}

/// A source of filesystem notifications
///
/// Implementations:
/// - `NotifyEventSource` - OS watcher via the `notify` crate
/// - `ManualEventSource` - notifications pushed in-process by a `ManualFeed`
pub trait EventSource: Send {
    /// Begin delivering notifications into `sink`
    fn start(&mut self, sink: NotificationSink) -> MicrosyncResult<()>;

    /// Stop delivering notifications; safe to call more than once
    fn stop(&mut self);
}
