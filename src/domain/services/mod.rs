//! Domain Services
//!
//! - `ChangeClassifier` - raw notification to `PathChange`
//! - `BuildContextAssembler` - `PathChange` batch to recipe + archive

mod assembler;
mod classifier;

pub use assembler::BuildContextAssembler;
pub use classifier::{ChangeClassifier, Classification, IgnoreReason};
