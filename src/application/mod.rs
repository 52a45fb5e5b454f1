//! Application Layer
//!
//! Use cases that wire domain services to ports. `watch` is the only one:
//! it drives the debounce loop and submits builds.

pub mod watch;

pub use watch::{
    BuildOrchestrator, DebounceLoop, LoopState, OrchestratorHandle, Session, SessionSummary,
    WatchEvent, WatchOptions,
};
