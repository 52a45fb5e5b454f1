//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod build_backend;
pub mod event_source;
pub mod file_system;

pub use build_backend::{BuildBackend, BuildError, BuildOutcome, BuildRequest};
pub use event_source::{EventSource, FsNotification, NotificationSink, WatchSignal};
pub use file_system::{FileSystem, FsError, FsResult};
