use std::path::PathBuf;

use anyhow::{Context, Result};

use microsync::application::{BuildOrchestrator, WatchEvent, WatchOptions};
use microsync::config::{self, Config, Overrides};
use microsync::domain::ports::BuildBackend;
use microsync::domain::value_objects::BuildFailurePolicy;
use microsync::infrastructure::{DockerCliBackend, DryRunBackend, NotifyEventSource};

use crate::cli::Cli;

pub fn cmd_watch(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let options = config.resolve()?;

    if cli.dry_run {
        return run(options, DryRunBackend::new(), cli.json);
    }

    let backend = DockerCliBackend::new(config.program());
    if !backend.check_available() {
        anyhow::bail!(
            "'{}' could not be run; install Docker, pass --docker <program>, or use --dry-run",
            backend.program()
        );
    }
    run(options, backend, cli.json)
}

/// File layers, then env, then flags
fn load_config(cli: &Cli) -> Result<Config> {
    let project_dir = match &cli.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };

    let (config, warnings) = config::load_layers(&project_dir, cli.config.as_deref())?;
    for warning in &warnings {
        match &warning.suggestion {
            Some(suggestion) => tracing::warn!(
                file = %warning.file.display(),
                line = ?warning.line,
                "unknown config key '{}', did you mean '{}'?",
                warning.key,
                suggestion
            ),
            None => tracing::warn!(
                file = %warning.file.display(),
                line = ?warning.line,
                "unknown config key '{}'",
                warning.key
            ),
        }
    }

    let overrides = Overrides {
        root: cli.path.clone(),
        destination_prefix: cli.prefix_path.clone(),
        base_image: cli.base_image.clone(),
        extensions: cli.file_extensions.clone(),
        debounce_secs: cli.timeout,
        track_deletes: cli.no_deletes.then_some(false),
        program: cli.docker.clone(),
        on_failure: cli
            .halt_on_build_failure
            .then_some(BuildFailurePolicy::Halt),
    };

    Ok(config::with_env_overrides(config)?.with_overrides(&overrides))
}

fn run<B: BuildBackend>(options: WatchOptions, backend: B, json: bool) -> Result<()> {
    let source = NotifyEventSource::new(options.root.clone());
    let mut orchestrator = BuildOrchestrator::new(options, source, backend);

    let handle = orchestrator.handle();
    ctrlc::set_handler(move || handle.stop()).context("failed to set Ctrl+C handler")?;

    let summary = orchestrator.start(|event| {
        if json {
            println!("{}", event.to_json());
        } else if let Some(line) = render_event(&event) {
            match event {
                WatchEvent::BuildFailed { .. } => eprintln!("{line}"),
                _ => println!("{line}"),
            }
        }
    })?;

    if !json {
        println!("Shutting down, built {} new images", summary.builds);
    }
    Ok(())
}

/// Human-readable line for an event; `None` for events only shown as logs
fn render_event(event: &WatchEvent) -> Option<String> {
    match event {
        WatchEvent::WatchStarted {
            root,
            base_image,
            timeout_secs,
        } => Some(format!(
            "Watching {root} for changes (base image {base_image}, timeout {timeout_secs}s)"
        )),
        WatchEvent::FileChanged { path, action } => Some(format!("  {action:<6} {path}")),
        WatchEvent::FileSkipped { .. } => None,
        WatchEvent::BuildStarted { files, deletions } => Some(format!(
            "Building: {files} file(s) copied, {deletions} removed"
        )),
        WatchEvent::BuildComplete { image, builds } => {
            Some(format!("Built {image} (#{builds}), starting over"))
        }
        WatchEvent::BuildFailed { message } => Some(format!("Build failed: {message}")),
        WatchEvent::BatchDiscarded { changes } => {
            Some(format!("Discarded {changes} unbuilt change(s)"))
        }
        WatchEvent::Shutdown { .. } => None,
    }
}
