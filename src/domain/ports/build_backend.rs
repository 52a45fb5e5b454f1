//! Build Backend Port
//!
//! Accepts a build-context archive plus a tag and produces an image. Layering
//! and caching are entirely the backend's concern.

use thiserror::Error;

/// A build submission
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Tar archive holding the changed files and the recipe
    pub archive: Vec<u8>,
    /// Use `archive` as the whole build context (always true for microsync)
    pub custom_context: bool,
    /// Tag applied to the resulting image
    pub tag: String,
}

impl BuildRequest {
    pub fn new(archive: Vec<u8>, tag: impl Into<String>) -> Self {
        Self {
            archive,
            custom_context: true,
            tag: tag.into(),
        }
    }
}

/// Successful build result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Image identifier reported by the backend
    pub image_id: String,
}

/// Build submission errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// The backend could not be reached or launched
    #[error("build backend unavailable: {0}")]
    Unavailable(String),

    /// The backend ran the build and it failed
    #[error("build rejected (exit status {status:?}): {stderr}")]
    Rejected { status: Option<i32>, stderr: String },

    /// Talking to the backend failed mid-build
    #[error("build I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A container build backend
///
/// Implementations:
/// - `DockerCliBackend` - shells out to `docker build`
/// - `DryRunBackend` - logs the recipe without building
pub trait BuildBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Submit a build and wait for it to finish
    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError>;
}
