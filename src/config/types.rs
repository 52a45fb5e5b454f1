//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::WatchOptions;
use crate::domain::value_objects::{
    BuildFailurePolicy, DebounceTimeout, ExtensionFilter, DEFAULT_DEBOUNCE_SECS,
};
use crate::error::{MicrosyncError, MicrosyncResult};

use super::loader::{self, ConfigWarning};

/// Default build program
pub const DEFAULT_DOCKER_PROGRAM: &str = "docker";

/// Watch configuration
///
/// Every field is optional so layers can be stacked; unset means "inherit".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Directory to watch; relative paths are resolved against the config file
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Suffix allow-list, e.g. `[".py", ".txt"]`
    #[serde(default)]
    pub extensions: Option<Vec<String>>,

    #[serde(default)]
    pub debounce_secs: Option<f64>,

    #[serde(default)]
    pub track_deletes: Option<bool>,
}

/// Image configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Image to build on top of; also the tag of each new image
    #[serde(default)]
    pub base: Option<String>,

    /// Where the watch root lives inside the image
    #[serde(default)]
    pub destination_prefix: Option<String>,
}

/// Build backend configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Docker-compatible CLI to invoke
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub on_failure: Option<BuildFailurePolicy>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub backend: BackendConfig,
}

/// Values given on the command line; highest priority layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub destination_prefix: Option<String>,
    pub base_image: Option<String>,
    /// Comma-separated suffixes
    pub extensions: Option<String>,
    pub debounce_secs: Option<f64>,
    pub track_deletes: Option<bool>,
    pub program: Option<String>,
    pub on_failure: Option<BuildFailurePolicy>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> MicrosyncResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and return any unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> MicrosyncResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Layer `other` on top of `self`; set fields in `other` win
    pub fn merge(self, other: Config) -> Config {
        Config {
            watch: WatchConfig {
                root: other.watch.root.or(self.watch.root),
                extensions: other.watch.extensions.or(self.watch.extensions),
                debounce_secs: other.watch.debounce_secs.or(self.watch.debounce_secs),
                track_deletes: other.watch.track_deletes.or(self.watch.track_deletes),
            },
            image: ImageConfig {
                base: other.image.base.or(self.image.base),
                destination_prefix: other
                    .image
                    .destination_prefix
                    .or(self.image.destination_prefix),
            },
            backend: BackendConfig {
                program: other.backend.program.or(self.backend.program),
                on_failure: other.backend.on_failure.or(self.backend.on_failure),
            },
        }
    }

    /// Apply command-line values
    pub fn with_overrides(mut self, overrides: &Overrides) -> Config {
        if let Some(root) = &overrides.root {
            self.watch.root = Some(root.clone());
        }
        if let Some(csv) = &overrides.extensions {
            self.watch.extensions = Some(ExtensionFilter::parse_csv(csv).suffixes().to_vec());
        }
        if let Some(secs) = overrides.debounce_secs {
            self.watch.debounce_secs = Some(secs);
        }
        if let Some(track) = overrides.track_deletes {
            self.watch.track_deletes = Some(track);
        }
        if let Some(base) = &overrides.base_image {
            self.image.base = Some(base.clone());
        }
        if let Some(prefix) = &overrides.destination_prefix {
            self.image.destination_prefix = Some(prefix.clone());
        }
        if let Some(program) = &overrides.program {
            self.backend.program = Some(program.clone());
        }
        if let Some(policy) = overrides.on_failure {
            self.backend.on_failure = Some(policy);
        }
        self
    }

    /// Build program, falling back to `docker`
    pub fn program(&self) -> &str {
        self.backend
            .program
            .as_deref()
            .unwrap_or(DEFAULT_DOCKER_PROGRAM)
    }

    /// Validate and turn the merged layers into watch options
    ///
    /// The root must exist and be a directory; it is canonicalized so event
    /// paths reported by the OS watcher share its prefix.
    pub fn resolve(&self) -> MicrosyncResult<WatchOptions> {
        let root = self
            .watch
            .root
            .as_ref()
            .ok_or(MicrosyncError::MissingSetting { key: "watch.root" })?;
        let root = match root.canonicalize() {
            Ok(path) if path.is_dir() => path,
            _ => {
                return Err(MicrosyncError::WatchRootNotFound { path: root.clone() });
            }
        };

        let base_image = required(&self.image.base, "image.base")?;
        let destination_prefix =
            required(&self.image.destination_prefix, "image.destination_prefix")?;

        let timeout = DebounceTimeout::from_secs_f64(
            self.watch.debounce_secs.unwrap_or(DEFAULT_DEBOUNCE_SECS),
        )?;
        let extensions = match &self.watch.extensions {
            Some(list) => ExtensionFilter::new(list.iter()),
            None => ExtensionFilter::allow_all(),
        };

        Ok(WatchOptions::new(root, destination_prefix, base_image)
            .with_extensions(extensions)
            .with_timeout(timeout)
            .with_track_deletes(self.watch.track_deletes.unwrap_or(true))
            .with_build_failure_policy(self.backend.on_failure.unwrap_or_default()))
    }
}

fn required(value: &Option<String>, key: &'static str) -> MicrosyncResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(MicrosyncError::MissingSetting { key }),
    }
}
