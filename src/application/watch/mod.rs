//! Watch use case
//!
//! Turns a stream of filesystem notifications into debounced image builds.
//!
//! - `event` - options and progress events
//! - `debounce_loop` - the Idle/Accumulating/Flushing/Stopped state machine
//! - `orchestrator` - lifecycle, build submission and the session counters

mod debounce_loop;
mod event;
mod orchestrator;


pub use debounce_loop::{DebounceLoop, LoopState};
pub use event::{WatchEvent, WatchOptions};
pub use orchestrator::{BuildOrchestrator, OrchestratorHandle, Session, SessionSummary};
