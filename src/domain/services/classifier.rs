//! Change Classifier Domain Service
//!
//! Turns one raw filesystem notification into a `PathChange`, or explains why
//! it produced nothing. Nothing here is fatal: unreadable files and filtered
//! paths are reported back to the caller and the batch carries on.

use std::path::{Component, Path, PathBuf};

use crate::domain::entities::PathChange;
use crate::domain::ports::{FileSystem, FsError, FsNotification};
use crate::domain::value_objects::ExtensionFilter;

/// Why a notification was ignored outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The path is not below the watch root (or is the root itself)
    OutsideRoot,
    /// The relative path is not valid UTF-8 and cannot be written into a recipe
    NonUtf8Path,
    /// A deletion arrived but delete tracking is off
    DeletesDisabled,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::OutsideRoot => write!(f, "outside watch root"),
            IgnoreReason::NonUtf8Path => write!(f, "path is not valid UTF-8"),
            IgnoreReason::DeletesDisabled => write!(f, "delete tracking disabled"),
        }
    }
}

/// Outcome of classifying one notification
#[derive(Debug)]
pub enum Classification {
    /// A change to add to the current batch
    Change(PathChange),
    /// Suffix matched nothing in the allow-list
    Filtered { relative_path: String },
    /// The file could not be read; the change is dropped
    Unreadable { relative_path: String, error: FsError },
    Ignored { path: PathBuf, reason: IgnoreReason },
}

impl Classification {
    pub fn into_change(self) -> Option<PathChange> {
        match self {
            Classification::Change(change) => Some(change),
            _ => None,
        }
    }
}

/// Maps notifications under `root` into `PathChange`s
pub struct ChangeClassifier<F> {
    root: PathBuf,
    filter: ExtensionFilter,
    track_deletes: bool,
    fs: F,
}

impl<F: FileSystem> ChangeClassifier<F> {
    pub fn new(root: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            root: root.into(),
            filter: ExtensionFilter::allow_all(),
            track_deletes: true,
            fs,
        }
    }

    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_track_deletes(mut self, track_deletes: bool) -> Self {
        self.track_deletes = track_deletes;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Classify a notification
    ///
    /// Created and Moved become `Add`, Modified becomes `Modify`; all three
    /// snapshot the file's bytes now. Moves only look at the destination.
    pub fn classify(&self, notification: &FsNotification) -> Classification {
        match notification {
            FsNotification::Created { path } | FsNotification::Moved { to: path, .. } => {
                self.snapshot(path, |p, bytes| PathChange::add(p, bytes))
            }
            FsNotification::Modified { path } => {
                self.snapshot(path, |p, bytes| PathChange::modify(p, bytes))
            }
            FsNotification::Deleted { path } => {
                if !self.track_deletes {
                    return Classification::Ignored {
                        path: path.clone(),
                        reason: IgnoreReason::DeletesDisabled,
                    };
                }
                match self.admit(path) {
                    Ok(relative_path) => Classification::Change(PathChange::delete(relative_path)),
                    Err(skipped) => skipped,
                }
            }
        }
    }

    fn snapshot(&self, path: &Path, make: fn(String, Vec<u8>) -> PathChange) -> Classification {
        let relative_path = match self.admit(path) {
            Ok(relative_path) => relative_path,
            Err(skipped) => return skipped,
        };
        match self.fs.read_bytes(path) {
            Ok(bytes) => Classification::Change(make(relative_path, bytes)),
            Err(error) => Classification::Unreadable {
                relative_path,
                error,
            },
        }
    }

    /// Relative path for `path` if it passes the root and extension checks
    fn admit(&self, path: &Path) -> Result<String, Classification> {
        let relative_path = relative_to(&self.root, path).map_err(|reason| {
            Classification::Ignored {
                path: path.to_path_buf(),
                reason,
            }
        })?;
        if !self.filter.allows(&relative_path) {
            return Err(Classification::Filtered { relative_path });
        }
        Ok(relative_path)
    }
}

/// Strip `root` from `path` and join the remainder with `/`
fn relative_to(root: &Path, path: &Path) -> Result<String, IgnoreReason> {
    let stripped = path
        .strip_prefix(root)
        .map_err(|_| IgnoreReason::OutsideRoot)?;

    let mut parts = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(part) => {
                parts.push(part.to_str().ok_or(IgnoreReason::NonUtf8Path)?);
            }
            Component::CurDir => {}
            _ => return Err(IgnoreReason::OutsideRoot),
        }
    }
    if parts.is_empty() {
        return Err(IgnoreReason::OutsideRoot);
    }
    Ok(parts.join("/"))
}
