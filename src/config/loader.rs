//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{BuildFailurePolicy, DebounceTimeout, ExtensionFilter};
use crate::error::{MicrosyncError, MicrosyncResult};

use super::types::Config;

/// Project config file name, looked up in the watch root
pub const PROJECT_CONFIG_FILE: &str = "microsync.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
///
/// A relative `watch.root` is resolved against the file's directory.
pub fn load_with_warnings(path: &Path) -> MicrosyncResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| MicrosyncError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(root) = config.watch.root.take() {
        let resolved = match path.parent() {
            Some(dir) if root.is_relative() => dir.join(root),
            _ => root,
        };
        config.watch.root = Some(resolved);
    }

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Stack the file layers: user config, then project config
///
/// `explicit` (from `--config`) replaces the project file lookup and must
/// exist. Without it, `microsync.toml` in `project_dir` is used when present.
pub fn load_layers(
    project_dir: &Path,
    explicit: Option<&Path>,
) -> MicrosyncResult<(Config, Vec<ConfigWarning>)> {
    let mut config = Config::default();
    let mut warnings = Vec::new();

    if let Some(user_config) = user_config_path().filter(|p| p.is_file()) {
        let (user, w) = load_with_warnings(&user_config)?;
        tracing::debug!(file = %user_config.display(), "loaded user config");
        config = config.merge(user);
        warnings.extend(w);
    }

    let project_config = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(project_dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file()),
    };
    if let Some(path) = project_config {
        let (project, w) = load_with_warnings(&path)?;
        tracing::debug!(file = %path.display(), "loaded project config");
        config = config.merge(project);
        warnings.extend(w);
    }

    Ok((config, warnings))
}

/// Apply environment variable overrides (MICROSYNC_* prefix)
pub fn with_env_overrides(config: Config) -> MicrosyncResult<Config> {
    apply_env(config, |key| std::env::var(key).ok())
}

pub(crate) fn apply_env<L>(mut config: Config, lookup: L) -> MicrosyncResult<Config>
where
    L: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    // MICROSYNC_DEBOUNCE_SECS
    if let Some(secs) = var("MICROSYNC_DEBOUNCE_SECS") {
        let timeout = DebounceTimeout::parse(&secs)?;
        config.watch.debounce_secs = Some(timeout.as_duration().as_secs_f64());
    }

    // MICROSYNC_EXTENSIONS (comma-separated)
    if let Some(csv) = var("MICROSYNC_EXTENSIONS") {
        config.watch.extensions = Some(ExtensionFilter::parse_csv(&csv).suffixes().to_vec());
    }

    if let Some(base) = var("MICROSYNC_BASE_IMAGE") {
        config.image.base = Some(base);
    }

    if let Some(prefix) = var("MICROSYNC_DESTINATION_PREFIX") {
        config.image.destination_prefix = Some(prefix);
    }

    if let Some(program) = var("MICROSYNC_DOCKER") {
        config.backend.program = Some(program);
    }

    // MICROSYNC_ON_BUILD_FAILURE (continue | halt)
    if let Some(policy) = var("MICROSYNC_ON_BUILD_FAILURE") {
        let policy: BuildFailurePolicy =
            policy
                .parse()
                .map_err(|message| MicrosyncError::InvalidSetting {
                    key: "MICROSYNC_ON_BUILD_FAILURE",
                    message,
                })?;
        config.backend.on_failure = Some(policy);
    }

    Ok(config)
}

/// `~/.config/microsync/config.toml` (platform config dir)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("microsync").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "watch",
        "root",
        "extensions",
        "debounce_secs",
        "track_deletes",
        "image",
        "base",
        "destination_prefix",
        "backend",
        "program",
        "on_failure",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
