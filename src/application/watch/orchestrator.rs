//! Build orchestrator
//!
//! Owns the watch session: attaches the event source, runs the debounce loop
//! on the calling thread, submits each flushed batch to the build backend and
//! counts the results. The backend is injected, never global.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;

use crate::domain::entities::PathChange;
use crate::domain::ports::{
    BuildBackend, BuildError, BuildRequest, EventSource, FileSystem, NotificationSink,
};
use crate::domain::services::{BuildContextAssembler, ChangeClassifier};
use crate::domain::value_objects::BuildFailurePolicy;
use crate::error::MicrosyncResult;
use crate::infrastructure::archive::encode_tar;
use crate::infrastructure::LocalFs;

use super::debounce_loop::DebounceLoop;
use super::event::{WatchEvent, WatchOptions};

/// Run state shared between the loop thread and controlling threads
#[derive(Debug, Default)]
pub struct Session {
    running: AtomicBool,
    stop_requested: AtomicBool,
    builds: AtomicU64,
    failed_builds: AtomicU64,
}

impl Session {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Successful builds so far
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn failed_builds(&self) -> u64 {
        self.failed_builds.load(Ordering::SeqCst)
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            builds: self.build_count(),
            failed_builds: self.failed_builds(),
        }
    }
}

/// Totals reported when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub builds: u64,
    pub failed_builds: u64,
}

/// Cloneable control handle, usable from any thread
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    session: Arc<Session>,
    sink: NotificationSink,
}

impl OrchestratorHandle {
    /// Ask the session to stop; idempotent
    ///
    /// Takes effect at the loop's next state transition. A build already
    /// submitted to the backend is not cancelled: `start` returns once it
    /// finishes. Changes still waiting for their debounce window are dropped.
    pub fn stop(&self) {
        if !self.session.stop_requested.swap(true, Ordering::SeqCst) {
            tracing::debug!("stop requested");
        }
        self.sink.wake();
    }

    pub fn build_count(&self) -> u64 {
        self.session.build_count()
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }
}

/// Drives the debounce loop and submits builds
///
/// Single-use: once stopped, `start` returns immediately.
pub struct BuildOrchestrator<S, B, F = LocalFs> {
    options: WatchOptions,
    source: S,
    backend: B,
    assembler: BuildContextAssembler,
    debounce: DebounceLoop<F>,
    session: Arc<Session>,
    sink: NotificationSink,
}

impl<S: EventSource, B: BuildBackend> BuildOrchestrator<S, B, LocalFs> {
    /// Create an orchestrator reading changed files from local disk
    pub fn new(options: WatchOptions, source: S, backend: B) -> Self {
        Self::with_file_system(options, source, backend, LocalFs::new())
    }
}

impl<S: EventSource, B: BuildBackend, F: FileSystem> BuildOrchestrator<S, B, F> {
    pub fn with_file_system(options: WatchOptions, source: S, backend: B, fs: F) -> Self {
        let (tx, rx) = channel();
        let classifier = ChangeClassifier::new(options.root.clone(), fs)
            .with_filter(options.extensions.clone())
            .with_track_deletes(options.track_deletes);
        let debounce = DebounceLoop::new(rx, classifier, options.timeout);
        let assembler = BuildContextAssembler::new(options.destination_prefix.clone());

        Self {
            options,
            source,
            backend,
            assembler,
            debounce,
            session: Arc::new(Session::default()),
            sink: NotificationSink::new(tx),
        }
    }

    pub fn handle(&self) -> OrchestratorHandle {
        OrchestratorHandle {
            session: self.session.clone(),
            sink: self.sink.clone(),
        }
    }

    pub fn stop(&self) {
        self.handle().stop();
    }

    pub fn build_count(&self) -> u64 {
        self.session.build_count()
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Watch and build until stopped (blocking)
    ///
    /// Returns the session totals. Fails if the event source cannot be
    /// attached, or on the first failed build under `BuildFailurePolicy::Halt`.
    pub fn start<E>(&mut self, on_event: E) -> MicrosyncResult<SessionSummary>
    where
        E: Fn(WatchEvent),
    {
        if self.session.stop_requested() {
            return Ok(self.session.summary());
        }

        on_event(WatchEvent::WatchStarted {
            root: self.options.root.display().to_string(),
            base_image: self.options.base_image.clone(),
            timeout_secs: self.options.timeout.as_duration().as_secs_f64(),
        });
        tracing::info!(
            root = %self.options.root.display(),
            timeout = %self.options.timeout,
            backend = self.backend.name(),
            "starting to watch for changed files"
        );

        self.source.start(self.sink.clone())?;
        self.session.running.store(true, Ordering::SeqCst);

        let result = self.run(&on_event);

        self.source.stop();
        self.session.running.store(false, Ordering::SeqCst);

        let summary = self.session.summary();
        tracing::info!(builds = summary.builds, failed = summary.failed_builds, "watch stopped");
        on_event(WatchEvent::Shutdown {
            builds: summary.builds,
        });

        result.map(|()| summary)
    }

    fn run(&mut self, on_event: &impl Fn(WatchEvent)) -> MicrosyncResult<()> {
        while let Some(batch) = self
            .debounce
            .next_batch(&self.session.stop_requested, on_event)
        {
            let outcome = self.flush(&batch, on_event);
            self.debounce.finish_flush();
            if let Err(e) = outcome {
                if self.options.on_build_failure == BuildFailurePolicy::Halt {
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }

    /// Assemble and submit one batch; the batch is gone either way
    fn flush(
        &self,
        batch: &[PathChange],
        on_event: &impl Fn(WatchEvent),
    ) -> Result<(), BuildError> {
        let context = self.assembler.assemble(&self.options.base_image, batch);
        on_event(WatchEvent::BuildStarted {
            files: context.copies(),
            deletions: context.removals(),
        });
        tracing::info!(
            files = context.copies(),
            deletions = context.removals(),
            "building image"
        );

        let result = encode_tar(&context.archive)
            .map_err(BuildError::from)
            .and_then(|archive| {
                let request = BuildRequest::new(archive, self.options.base_image.clone());
                self.backend.build(&request)
            });

        match result {
            Ok(outcome) => {
                let builds = self.session.builds.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!(image = %outcome.image_id, builds, "image built, starting over");
                on_event(WatchEvent::BuildComplete {
                    image: outcome.image_id,
                    builds,
                });
                Ok(())
            }
            Err(e) => {
                self.session.failed_builds.fetch_add(1, Ordering::SeqCst);
                tracing::error!(
                    error = %e,
                    changes = batch.len(),
                    "build failed, discarding batch"
                );
                on_event(WatchEvent::BuildFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
