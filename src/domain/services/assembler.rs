//! Build Context Assembler Domain Service
//!
//! Renders a drained batch into a recipe plus the archive it copies from.
//! Pure: the archive holds the bytes captured at classification time, so a
//! file that changes again while we assemble cannot leak into this build.

use crate::domain::entities::{
    BuildArchive, BuildContext, BuildRecipe, ChangeAction, Instruction, PathChange,
    RECIPE_ENTRY_NAME,
};

/// Renders batches into build contexts
#[derive(Debug, Clone)]
pub struct BuildContextAssembler {
    destination_prefix: String,
}

impl BuildContextAssembler {
    /// `destination_prefix` is where the watch root lives inside the image
    pub fn new(destination_prefix: impl Into<String>) -> Self {
        let prefix = destination_prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        // A bare "/" trims to "" and targets become "/<path>"
        Self {
            destination_prefix: trimmed.to_string(),
        }
    }

    pub fn destination_prefix(&self) -> &str {
        &self.destination_prefix
    }

    fn target_for(&self, relative_path: &str) -> String {
        format!("{}/{}", self.destination_prefix, relative_path)
    }

    /// Build the recipe and archive for `entries`, in order
    pub fn assemble(&self, base_image: &str, entries: &[PathChange]) -> BuildContext {
        let mut recipe = BuildRecipe::from_image(base_image);
        let mut archive = BuildArchive::new();

        for change in entries {
            let target = self.target_for(change.relative_path());
            match (change.action(), change.content()) {
                (ChangeAction::Add | ChangeAction::Modify, Some(bytes)) => {
                    archive.push(change.relative_path(), bytes.to_vec());
                    recipe.push(Instruction::Copy {
                        source: change.relative_path().to_string(),
                        target,
                    });
                }
                (ChangeAction::Delete, _) => recipe.push(Instruction::Remove { target }),
                // Constructors guarantee content for Add/Modify
                (_, None) => {}
            }
        }

        archive.push(RECIPE_ENTRY_NAME, recipe.render().into_bytes());
        BuildContext { recipe, archive }
    }
}
