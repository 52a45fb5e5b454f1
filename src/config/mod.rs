//! Configuration module for microsync
//!
//! Layers, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (MICROSYNC_*)
//! 3. Project config (`microsync.toml` in the watch root, or `--config`)
//! 4. User config (`~/.config/microsync/config.toml`)
//! 5. Built-in defaults

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{
    load_layers, load_with_warnings, user_config_path, with_env_overrides, ConfigWarning,
    PROJECT_CONFIG_FILE,
};
pub use types::{
    BackendConfig, Config, ImageConfig, Overrides, WatchConfig, DEFAULT_DOCKER_PROGRAM,
};
