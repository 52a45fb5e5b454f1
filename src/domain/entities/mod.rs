//! Domain Entities
//!
//! - `PathChange` - one normalised change to a path under the watch root
//! - `ChangeSet` - the ordered, deduplicated batch of pending changes
//! - `BuildRecipe` / `BuildArchive` - the two halves of a build context

mod build_context;
mod change_set;
mod path_change;

pub use build_context::{
    ArchiveEntry, BuildArchive, BuildContext, BuildRecipe, Instruction, RECIPE_ENTRY_NAME,
};
pub use change_set::ChangeSet;
pub use path_change::{ChangeAction, PathChange};
