//! PathChange Entity
//!
//! A single normalised change to a file under the watch root.

use std::fmt;

/// What happened to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// File appeared (created, or moved into place)
    Add,
    /// File content changed
    Modify,
    /// File was removed
    Delete,
}

impl ChangeAction {
    /// Whether this action ships file content into the build context
    pub fn carries_content(self) -> bool {
        !matches!(self, ChangeAction::Delete)
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeAction::Add => "add",
            ChangeAction::Modify => "modify",
            ChangeAction::Delete => "delete",
        };
        f.pad(name)
    }
}

/// A change to one path, relative to the watch root
///
/// `content` is the snapshot captured when the change was classified and is
/// present exactly when the action is `Add` or `Modify`. The constructors
/// are the only way to build a `PathChange`, which keeps that pairing intact.
#[derive(Clone, PartialEq, Eq)]
pub struct PathChange {
    relative_path: String,
    action: ChangeAction,
    content: Option<Vec<u8>>,
}

impl PathChange {
    /// A file that appeared at `relative_path`
    pub fn add(relative_path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            relative_path: relative_path.into(),
            action: ChangeAction::Add,
            content: Some(content),
        }
    }

    /// A file whose content changed
    pub fn modify(relative_path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            relative_path: relative_path.into(),
            action: ChangeAction::Modify,
            content: Some(content),
        }
    }

    /// A file that was removed
    pub fn delete(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            action: ChangeAction::Delete,
            content: None,
        }
    }

    /// Path relative to the watch root, `/`-separated
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn action(&self) -> ChangeAction {
        self.action
    }

    /// Captured bytes, `None` for deletions
    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }
}

// Content can be large; keep Debug output to the size.
impl fmt::Debug for PathChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathChange")
            .field("relative_path", &self.relative_path)
            .field("action", &self.action)
            .field("content_len", &self.content.as_ref().map(Vec::len))
            .finish()
    }
}
