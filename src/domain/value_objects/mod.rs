//! Domain Value Objects
//!
//! Immutable, validated configuration values used by the core.

mod build_failure;
mod debounce;
mod extension_filter;

pub use build_failure::BuildFailurePolicy;
pub use debounce::{DebounceTimeout, DEFAULT_DEBOUNCE_SECS};
pub use extension_filter::ExtensionFilter;
