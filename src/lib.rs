//! microsync - incremental container image updates from watched source trees
//!
//! microsync watches a directory, waits for changes to settle, and submits a
//! small build context (a recipe copying the changed files onto a base image,
//! plus the files themselves) to a container build backend.
//!
//! Layers:
//! - `domain` - change entities, value objects, classification and assembly
//!   services, and the port traits (`EventSource`, `BuildBackend`, `FileSystem`)
//! - `application` - the debounce loop and the build orchestrator
//! - `infrastructure` - `notify` event source, local filesystem, tar encoding,
//!   `docker` CLI and dry-run backends
//! - `config` - layered configuration producing `WatchOptions`

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;

// Re-exports for convenience
pub use application::{
    BuildOrchestrator, OrchestratorHandle, SessionSummary, WatchEvent, WatchOptions,
};
pub use config::Config;
pub use error::{MicrosyncError, MicrosyncResult};
