use std::path::PathBuf;

use clap::Parser;

/// microsync - rebuild a container image incrementally as files change
#[derive(Parser, Debug)]
#[command(name = "microsync")]
#[command(author, version, about, long_about = None)]
#[command(after_help = concat!(
    "Missing arguments fall back to MICROSYNC_* env vars, microsync.toml in PATH, ",
    "then ~/.config/microsync/config.toml."
))]
pub struct Cli {
    /// Directory to watch
    pub path: Option<PathBuf>,

    /// Where PATH lives inside the image
    pub prefix_path: Option<String>,

    /// Image to build on; each new image is tagged with this name
    pub base_image: Option<String>,

    /// Only react to files ending in one of these suffixes (e.g. ".py,.txt")
    #[arg(long, value_name = "CSV_LIST")]
    pub file_extensions: Option<String>,

    /// Seconds after the last change before building [default: 0.5]
    #[arg(long, value_name = "SECONDS", allow_negative_numbers = true)]
    pub timeout: Option<f64>,

    /// Config file to use instead of PATH/microsync.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ignore deletions instead of removing files from the image
    #[arg(long)]
    pub no_deletes: bool,

    /// Exit on the first failed build instead of waiting for more changes
    #[arg(long)]
    pub halt_on_build_failure: bool,

    /// Docker-compatible CLI used to build
    #[arg(long, value_name = "PROGRAM")]
    pub docker: Option<String>,

    /// Log the build recipe instead of building
    #[arg(long)]
    pub dry_run: bool,

    /// Output NDJSON events on stdout and JSON logs on stderr
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
