//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk reads.

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};
use std::path::Path;

/// Local file system implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_bytes(&self, path: &Path) -> FsResult<Vec<u8>> {
        let metadata = std::fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
        if !metadata.is_file() {
            return Err(FsError::NotAFile(path.to_path_buf()));
        }
        std::fs::read(path).map_err(|e| FsError::from_io(path, e))
    }
}
