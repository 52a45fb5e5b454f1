//! Debounce loop
//!
//! Sole consumer of the notification queue and sole writer of the batch's
//! `ChangeSet`. Waiting on the queue is the only suspension point: with no
//! pending changes the wait has no deadline, with pending changes it is
//! bounded by the debounce timeout, restarted by every notification. A
//! receive that times out is the flush decision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::domain::entities::{ChangeSet, PathChange};
use crate::domain::ports::{FileSystem, FsNotification, WatchSignal};
use crate::domain::services::{ChangeClassifier, Classification};
use crate::domain::value_objects::DebounceTimeout;

use super::event::WatchEvent;

/// Where the loop is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Nothing pending; waiting for the next notification indefinitely
    Idle,
    /// Changes pending; waiting at most one timeout for more
    Accumulating,
    /// A drained batch is out for building
    Flushing,
    /// Terminal
    Stopped,
}

pub struct DebounceLoop<F> {
    queue: Receiver<WatchSignal>,
    classifier: ChangeClassifier<F>,
    changes: ChangeSet,
    timeout: Duration,
    state: LoopState,
}

impl<F: FileSystem> DebounceLoop<F> {
    pub fn new(
        queue: Receiver<WatchSignal>,
        classifier: ChangeClassifier<F>,
        timeout: DebounceTimeout,
    ) -> Self {
        Self {
            queue,
            classifier,
            changes: ChangeSet::new(),
            timeout: timeout.as_duration(),
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of distinct paths waiting in the current batch
    pub fn pending(&self) -> usize {
        self.changes.len()
    }

    /// Block until a batch is ready to build, or the loop stops
    ///
    /// Returns the drained batch and leaves the loop in `Flushing`; call
    /// [`finish_flush`](Self::finish_flush) once the build returns. Returns
    /// `None` when `stop` is set (pending changes are discarded) or every
    /// producer has gone away with nothing pending.
    pub fn next_batch(
        &mut self,
        stop: &AtomicBool,
        on_event: &impl Fn(WatchEvent),
    ) -> Option<Vec<PathChange>> {
        loop {
            if stop.load(Ordering::SeqCst) {
                self.halt(on_event);
                return None;
            }

            let received = match self.state {
                LoopState::Idle => self
                    .queue
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
                LoopState::Accumulating => self.queue.recv_timeout(self.timeout),
                LoopState::Flushing => {
                    self.finish_flush();
                    continue;
                }
                LoopState::Stopped => return None,
            };

            match received {
                Ok(WatchSignal::Notification(notification)) => {
                    self.observe(&notification, on_event)
                }
                Ok(WatchSignal::Wake) => {}
                Err(RecvTimeoutError::Timeout) => {
                    self.state = LoopState::Flushing;
                    return Some(self.changes.drain());
                }
                Err(RecvTimeoutError::Disconnected) => {
                    if self.changes.is_empty() {
                        tracing::debug!("notification queue closed");
                        self.state = LoopState::Stopped;
                        return None;
                    }
                    // Producers are gone; flush what we have, stop next round
                    self.state = LoopState::Flushing;
                    return Some(self.changes.drain());
                }
            }
        }
    }

    /// The batch handed out by `next_batch` has been dealt with
    pub fn finish_flush(&mut self) {
        if self.state == LoopState::Flushing {
            self.state = LoopState::Idle;
        }
    }

    fn halt(&mut self, on_event: &impl Fn(WatchEvent)) {
        if !self.changes.is_empty() {
            let dropped = self.changes.drain().len();
            tracing::warn!(changes = dropped, "stopping with unbuilt changes, discarding them");
            on_event(WatchEvent::BatchDiscarded { changes: dropped });
        }
        self.state = LoopState::Stopped;
    }

    fn observe(&mut self, notification: &FsNotification, on_event: &impl Fn(WatchEvent)) {
        match self.classifier.classify(notification) {
            Classification::Change(change) => {
                tracing::info!(
                    path = change.relative_path(),
                    action = %change.action(),
                    "adding change to batch"
                );
                on_event(WatchEvent::FileChanged {
                    path: change.relative_path().to_string(),
                    action: change.action(),
                });
                self.changes.apply(change);
                self.state = LoopState::Accumulating;
            }
            Classification::Filtered { relative_path } => {
                tracing::info!(path = %relative_path, "file extension doesn't match, skipping");
                on_event(WatchEvent::FileSkipped {
                    path: relative_path,
                    reason: "extension not allowed".to_string(),
                });
            }
            Classification::Unreadable {
                relative_path,
                error,
            } => {
                tracing::warn!(
                    path = %relative_path,
                    error = %error,
                    "failed to read changed file"
                );
                on_event(WatchEvent::FileSkipped {
                    path: relative_path,
                    reason: error.to_string(),
                });
            }
            Classification::Ignored { path, reason } => {
                tracing::debug!(path = %path.display(), %reason, "ignoring notification");
            }
        }
    }
}
