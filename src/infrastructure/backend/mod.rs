//! Build backend implementations

mod docker_cli;
mod dry_run;

pub use docker_cli::DockerCliBackend;
pub use dry_run::DryRunBackend;
