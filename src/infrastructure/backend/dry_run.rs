//! Dry-run build backend
//!
//! Decodes the submitted context and logs the recipe instead of building.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::RECIPE_ENTRY_NAME;
use crate::domain::ports::{BuildBackend, BuildError, BuildOutcome, BuildRequest};
use crate::infrastructure::archive::decode_tar;

#[derive(Debug, Default)]
pub struct DryRunBackend {
    submitted: AtomicU64,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contexts received so far
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }
}

impl BuildBackend for DryRunBackend {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        let entries = decode_tar(&request.archive)?;
        let recipe = entries
            .iter()
            .find(|(name, _)| name == RECIPE_ENTRY_NAME)
            .map(|(_, bytes)| String::from_utf8_lossy(bytes).into_owned())
            .ok_or_else(|| BuildError::Rejected {
                status: None,
                stderr: format!("context has no {} entry", RECIPE_ENTRY_NAME),
            })?;

        let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            tag = %request.tag,
            files = entries.len() - 1,
            "dry run, not building:\n{}",
            recipe
        );

        Ok(BuildOutcome {
            image_id: format!("dry-run-{}", n),
        })
    }
}
