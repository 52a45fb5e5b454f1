//! microsync CLI - incremental image builds from a watched directory
//!
//! Usage: microsync [PATH] [PREFIX_PATH] [BASE_IMAGE] [OPTIONS]
//!
//! Watches PATH and, once changes settle, builds a new BASE_IMAGE that copies
//! the changed files under PREFIX_PATH. Ctrl+C stops watching.

use anyhow::Result;
use clap::Parser;

use microsync::telemetry::{self, LogFormat};

mod cli;
mod commands;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    telemetry::init(cli.verbose, format);

    commands::watch::cmd_watch(&cli)
}
