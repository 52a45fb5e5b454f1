//! FileSystem port - abstraction over reading changed files
//!
//! The classifier snapshots file bytes through this trait so it can be tested
//! without touching disk.

use std::path::{Path, PathBuf};

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found (often: deleted again before we got to it)
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// Path exists but is not a regular file
    NotAFile(PathBuf),
    /// I/O error
    Io(PathBuf, std::io::Error),
}

impl FsError {
    /// Classify an I/O error raised while accessing `path`
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::NotAFile(path) => write!(f, "Not a regular file: {}", path.display()),
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for FsError {}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - `MemoryFs` (tests) - in-memory map
pub trait FileSystem: Send + Sync {
    /// Read a regular file's full content
    fn read_bytes(&self, path: &Path) -> FsResult<Vec<u8>>;
}

impl<T: FileSystem + ?Sized> FileSystem for std::sync::Arc<T> {
    fn read_bytes(&self, path: &Path) -> FsResult<Vec<u8>> {
        (**self).read_bytes(path)
    }
}
