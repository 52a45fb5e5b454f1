//! Tests for the config module

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::loader::apply_env;
use super::types::*;
use super::{load_layers, load_with_warnings};
use crate::domain::value_objects::{BuildFailurePolicy, DebounceTimeout};
use crate::error::MicrosyncError;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn complete(root: PathBuf) -> Config {
    Config {
        watch: WatchConfig {
            root: Some(root),
            ..Default::default()
        },
        image: ImageConfig {
            base: Some("base:latest".to_string()),
            destination_prefix: Some("/prefix".to_string()),
        },
        ..Default::default()
    }
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[watch]
root = "/srv/app"
extensions = [".py", ".txt"]
debounce_secs = 1.5
track_deletes = false

[image]
base = "myapp:dev"
destination_prefix = "/app"

[backend]
program = "podman"
on_failure = "halt"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.watch.root, Some(PathBuf::from("/srv/app")));
    assert_eq!(
        config.watch.extensions,
        Some(vec![".py".to_string(), ".txt".to_string()])
    );
    assert_eq!(config.watch.debounce_secs, Some(1.5));
    assert_eq!(config.watch.track_deletes, Some(false));
    assert_eq!(config.image.base.as_deref(), Some("myapp:dev"));
    assert_eq!(config.program(), "podman");
    assert_eq!(config.backend.on_failure, Some(BuildFailurePolicy::Halt));
}

#[test]
fn test_config_default_program() {
    assert_eq!(Config::default().program(), DEFAULT_DOCKER_PROGRAM);
}

#[test]
fn test_unknown_keys_produce_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("microsync.toml");
    fs::write(
        &path,
        "[watch]\ndebounce_sec = 2.0\n\n[image]\nbase = \"b\"\n",
    )
    .unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();
    assert_eq!(config.image.base.as_deref(), Some("b"));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "debounce_sec");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("debounce_secs"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("microsync.toml");
    fs::write(&path, "[watch\nroot = 1").unwrap();

    let err = load_with_warnings(&path).unwrap_err();
    assert!(matches!(err, MicrosyncError::InvalidConfig { .. }));
}

#[test]
fn test_relative_root_resolves_against_config_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("microsync.toml");
    fs::write(&path, "[watch]\nroot = \"src\"\n").unwrap();

    let (config, _) = load_with_warnings(&path).unwrap();
    assert_eq!(config.watch.root, Some(dir.path().join("src")));
}

#[test]
fn test_project_file_is_loaded_from_project_dir() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("microsync.toml"),
        "[image]\nbase = \"from-file\"\n",
    )
    .unwrap();

    let (config, _) = load_layers(dir.path(), None).unwrap();
    assert_eq!(config.image.base.as_deref(), Some("from-file"));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(load_layers(dir.path(), Some(&missing)).is_err());
}

#[test]
fn test_merge_prefers_upper_layer() {
    let lower = Config {
        watch: WatchConfig {
            debounce_secs: Some(2.0),
            track_deletes: Some(false),
            ..Default::default()
        },
        image: ImageConfig {
            base: Some("lower".to_string()),
            destination_prefix: Some("/lower".to_string()),
        },
        ..Default::default()
    };
    let upper = Config {
        image: ImageConfig {
            base: Some("upper".to_string()),
            destination_prefix: None,
        },
        ..Default::default()
    };

    let merged = lower.merge(upper);
    assert_eq!(merged.image.base.as_deref(), Some("upper"));
    assert_eq!(merged.image.destination_prefix.as_deref(), Some("/lower"));
    assert_eq!(merged.watch.debounce_secs, Some(2.0));
    assert_eq!(merged.watch.track_deletes, Some(false));
}

#[test]
fn test_env_overrides_file_values() {
    let file = Config {
        image: ImageConfig {
            base: Some("file".to_string()),
            destination_prefix: Some("/file".to_string()),
        },
        ..Default::default()
    };

    let config = apply_env(
        file,
        env(&[
            ("MICROSYNC_BASE_IMAGE", "env:latest"),
            ("MICROSYNC_DEBOUNCE_SECS", "2"),
            ("MICROSYNC_EXTENSIONS", ".py, .txt"),
            ("MICROSYNC_DOCKER", "podman"),
            ("MICROSYNC_ON_BUILD_FAILURE", "HALT"),
        ]),
    )
    .unwrap();

    assert_eq!(config.image.base.as_deref(), Some("env:latest"));
    assert_eq!(config.image.destination_prefix.as_deref(), Some("/file"));
    assert_eq!(config.watch.debounce_secs, Some(2.0));
    assert_eq!(
        config.watch.extensions,
        Some(vec![".py".to_string(), ".txt".to_string()])
    );
    assert_eq!(config.program(), "podman");
    assert_eq!(config.backend.on_failure, Some(BuildFailurePolicy::Halt));
}

#[test]
fn test_env_blank_values_are_ignored() {
    let config = apply_env(Config::default(), env(&[("MICROSYNC_BASE_IMAGE", "  ")])).unwrap();
    assert_eq!(config.image.base, None);
}

#[test]
fn test_env_rejects_bad_values() {
    let err = apply_env(Config::default(), env(&[("MICROSYNC_DEBOUNCE_SECS", "0")])).unwrap_err();
    assert!(matches!(err, MicrosyncError::InvalidTimeout { .. }));

    let err = apply_env(
        Config::default(),
        env(&[("MICROSYNC_ON_BUILD_FAILURE", "retry")]),
    )
    .unwrap_err();
    assert!(matches!(err, MicrosyncError::InvalidSetting { .. }));
}

#[test]
fn test_cli_overrides_env() {
    let config = apply_env(
        Config::default(),
        env(&[("MICROSYNC_BASE_IMAGE", "env"), ("MICROSYNC_DEBOUNCE_SECS", "3")]),
    )
    .unwrap()
    .with_overrides(&Overrides {
        base_image: Some("cli".to_string()),
        track_deletes: Some(false),
        extensions: Some(".rs".to_string()),
        ..Default::default()
    });

    assert_eq!(config.image.base.as_deref(), Some("cli"));
    assert_eq!(config.watch.debounce_secs, Some(3.0));
    assert_eq!(config.watch.track_deletes, Some(false));
    assert_eq!(config.watch.extensions, Some(vec![".rs".to_string()]));
}

#[test]
fn test_resolve_produces_watch_options() {
    let dir = tempdir().unwrap();
    let mut config = complete(dir.path().to_path_buf());
    config.watch.extensions = Some(vec![".py".to_string()]);
    config.watch.debounce_secs = Some(1.0);

    let options = config.resolve().unwrap();
    assert_eq!(options.root, dir.path().canonicalize().unwrap());
    assert_eq!(options.base_image, "base:latest");
    assert_eq!(options.destination_prefix, "/prefix");
    assert_eq!(options.timeout, DebounceTimeout::from_secs_f64(1.0).unwrap());
    assert!(options.extensions.allows("main.py"));
    assert!(!options.extensions.allows("main.rs"));
    assert!(options.track_deletes);
    assert_eq!(options.on_build_failure, BuildFailurePolicy::Continue);
}

#[test]
fn test_resolve_defaults_timeout() {
    let dir = tempdir().unwrap();
    let options = complete(dir.path().to_path_buf()).resolve().unwrap();
    assert_eq!(options.timeout, DebounceTimeout::default());
    assert!(options.extensions.is_unrestricted());
}

#[test]
fn test_resolve_rejects_bad_timeouts() {
    let dir = tempdir().unwrap();
    for secs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut config = complete(dir.path().to_path_buf());
        config.watch.debounce_secs = Some(secs);
        let err = config.resolve().unwrap_err();
        assert!(
            matches!(err, MicrosyncError::InvalidTimeout { .. }),
            "{} accepted",
            secs
        );
    }
}

#[test]
fn test_resolve_requires_settings() {
    let dir = tempdir().unwrap();

    let err = Config::default().resolve().unwrap_err();
    assert!(matches!(
        err,
        MicrosyncError::MissingSetting { key: "watch.root" }
    ));

    let mut config = complete(dir.path().to_path_buf());
    config.image.base = Some("   ".to_string());
    let err = config.resolve().unwrap_err();
    assert!(matches!(
        err,
        MicrosyncError::MissingSetting { key: "image.base" }
    ));

    let mut config = complete(dir.path().to_path_buf());
    config.image.destination_prefix = None;
    let err = config.resolve().unwrap_err();
    assert!(matches!(
        err,
        MicrosyncError::MissingSetting {
            key: "image.destination_prefix"
        }
    ));
}

#[test]
fn test_resolve_rejects_missing_root() {
    let dir = tempdir().unwrap();
    let config = complete(dir.path().join("does-not-exist"));
    let err = config.resolve().unwrap_err();
    assert!(matches!(err, MicrosyncError::WatchRootNotFound { .. }));

    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    let err = complete(file).resolve().unwrap_err();
    assert!(matches!(err, MicrosyncError::WatchRootNotFound { .. }));
}
