//! Build context entities
//!
//! A build context is the recipe (textual build instructions) plus the archive
//! of file bytes the recipe copies from.

use std::fmt;

/// Archive entry name under which the backend expects the recipe
pub const RECIPE_ENTRY_NAME: &str = "Dockerfile";

/// One recipe instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `from <image>`
    From { image: String },
    /// `copy '<source>' '<target>'`
    Copy { source: String, target: String },
    /// `run rm '<target>' || exit 0`, never fails the build
    Remove { target: String },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::From { image } => write!(f, "from {}", image),
            Instruction::Copy { source, target } => write!(f, "copy '{}' '{}'", source, target),
            Instruction::Remove { target } => write!(f, "run rm '{}' || exit 0", target),
        }
    }
}

/// Ordered build instructions; the first is always `From`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecipe {
    instructions: Vec<Instruction>,
}

impl BuildRecipe {
    /// Start a recipe on top of `base_image`
    pub fn from_image(base_image: impl Into<String>) -> Self {
        Self {
            instructions: vec![Instruction::From {
                image: base_image.into(),
            }],
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instructions after the leading `from`
    pub fn changes(&self) -> &[Instruction] {
        &self.instructions[1..]
    }

    /// Newline-joined recipe text
    pub fn render(&self) -> String {
        self.instructions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A named file in the build archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Ordered archive entries handed to the backend as the build context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArchive {
    entries: Vec<ArchiveEntry>,
}

impl BuildArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.entries.push(ArchiveEntry {
            name: name.into(),
            bytes,
        });
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recipe and archive for one batch
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub recipe: BuildRecipe,
    pub archive: BuildArchive,
}

impl BuildContext {
    /// Number of copy instructions
    pub fn copies(&self) -> usize {
        self.recipe
            .changes()
            .iter()
            .filter(|i| matches!(i, Instruction::Copy { .. }))
            .count()
    }

    /// Number of removal instructions
    pub fn removals(&self) -> usize {
        self.recipe
            .changes()
            .iter()
            .filter(|i| matches!(i, Instruction::Remove { .. }))
            .count()
    }
}
