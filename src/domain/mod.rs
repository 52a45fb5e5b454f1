//! Domain Layer
//!
//! The change-coalescing and build-context-assembly core, free of I/O.
//!
//! ## Structure
//!
//! - `entities/` - `PathChange`, `ChangeSet`, `BuildRecipe`, `BuildArchive`
//! - `value_objects/` - `ExtensionFilter`, `DebounceTimeout`
//! - `services/` - `ChangeClassifier`, `BuildContextAssembler`
//! - `ports/` - Interfaces for the event source, build backend and file reads
//!
//! File reads happen only through the `FileSystem` port, so the classifier can
//! be exercised against an in-memory filesystem.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
