//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports.
//!
//! - `fs` - local file reads
//! - `events` - `notify`-backed and manual event sources
//! - `archive` - tar encoding of build archives
//! - `backend` - `docker` CLI and dry-run build backends

pub mod archive;
pub mod backend;
pub mod events;
pub mod fs;

pub use backend::{DockerCliBackend, DryRunBackend};
pub use events::{ManualEventSource, ManualFeed, NotifyEventSource};
pub use fs::LocalFs;
