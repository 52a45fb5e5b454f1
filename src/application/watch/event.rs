//! Watch event types and options

use std::path::PathBuf;

use crate::domain::entities::ChangeAction;
use crate::domain::value_objects::{BuildFailurePolicy, DebounceTimeout, ExtensionFilter};

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory tree to watch
    pub root: PathBuf,
    /// Where `root` lives inside the image
    pub destination_prefix: String,
    /// Image to build on top of, and the tag the result is given
    pub base_image: String,
    /// Suffix allow-list; empty admits everything
    pub extensions: ExtensionFilter,
    /// Quiescence window before a batch is flushed
    pub timeout: DebounceTimeout,
    /// Turn deletions into removal instructions
    pub track_deletes: bool,
    /// Whether a failed build ends the session
    pub on_build_failure: BuildFailurePolicy,
}

impl WatchOptions {
    /// Create new watch options with the required fields
    pub fn new(
        root: impl Into<PathBuf>,
        destination_prefix: impl Into<String>,
        base_image: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            destination_prefix: destination_prefix.into(),
            base_image: base_image.into(),
            extensions: ExtensionFilter::allow_all(),
            timeout: DebounceTimeout::default(),
            track_deletes: true,
            on_build_failure: BuildFailurePolicy::Continue,
        }
    }

    pub fn with_extensions(mut self, extensions: ExtensionFilter) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_timeout(mut self, timeout: DebounceTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_track_deletes(mut self, track_deletes: bool) -> Self {
        self.track_deletes = track_deletes;
        self
    }

    pub fn with_build_failure_policy(mut self, policy: BuildFailurePolicy) -> Self {
        self.on_build_failure = policy;
        self
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted {
        root: String,
        base_image: String,
        timeout_secs: f64,
    },
    /// A change joined the current batch
    FileChanged { path: String, action: ChangeAction },
    /// A notification produced no change
    FileSkipped { path: String, reason: String },
    /// A batch is being submitted
    BuildStarted { files: usize, deletions: usize },
    /// The backend produced an image
    BuildComplete { image: String, builds: u64 },
    /// The backend rejected the batch; its changes are dropped
    BuildFailed { message: String },
    /// Pending changes were dropped because the session stopped
    BatchDiscarded { changes: usize },
    /// Watch stopped
    Shutdown { builds: u64 },
}

impl WatchEvent {
    /// Serialize as a single NDJSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"event":"error"}"#.to_string())
    }
}
