//! Manual event source
//!
//! Notifications are pushed in-process through a `ManualFeed`, which makes the
//! debounce loop drivable from tests and from embedders that already have
//! their own change detection. A forwarding thread plays the role of the
//! watcher thread, so delivery goes through the same queue as real events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::domain::ports::{EventSource, FsNotification, NotificationSink};
use crate::error::MicrosyncResult;

/// How often the forwarder re-checks its running flag
const FORWARD_POLL_MS: u64 = 50;

/// Producer handle for a `ManualEventSource`
#[derive(Debug, Clone)]
pub struct ManualFeed {
    tx: Sender<FsNotification>,
}

impl ManualFeed {
    /// Queue a notification; returns `false` once the source has shut down
    pub fn push(&self, notification: FsNotification) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// Event source fed by a `ManualFeed`
pub struct ManualEventSource {
    rx: Option<Receiver<FsNotification>>,
    running: Arc<AtomicBool>,
    forwarder: Option<JoinHandle<()>>,
}

impl ManualEventSource {
    pub fn new() -> (Self, ManualFeed) {
        let (tx, rx) = channel();
        let source = Self {
            rx: Some(rx),
            running: Arc::new(AtomicBool::new(false)),
            forwarder: None,
        };
        (source, ManualFeed { tx })
    }
}

impl EventSource for ManualEventSource {
    fn start(&mut self, sink: NotificationSink) -> MicrosyncResult<()> {
        let Some(rx) = self.rx.take() else {
            // Already started once; the feed is bound to the first sink
            return Ok(());
        };
        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let forwarder = std::thread::Builder::new()
            .name("microsync-manual-feed".to_string())
            .spawn(move || {
                while running.load(Ordering::SeqCst) {
                    match rx.recv_timeout(Duration::from_millis(FORWARD_POLL_MS)) {
                        Ok(notification) => {
                            if !sink.send(notification) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;
        self.forwarder = Some(forwarder);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(forwarder) = self.forwarder.take() {
            let _ = forwarder.join();
        }
    }
}

impl Drop for ManualEventSource {
    fn drop(&mut self) {
        self.stop();
    }
}
