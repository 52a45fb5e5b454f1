//! Docker CLI build backend
//!
//! Pipes the build context tar into `docker build --quiet --tag <tag> -`.
//! With `-` as the context the CLI treats stdin as the full context archive
//! and looks for the recipe under `Dockerfile` inside it. Any CLI with the
//! same interface (e.g. `podman`) can be used via `program`.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::domain::ports::{BuildBackend, BuildError, BuildOutcome, BuildRequest};

/// Build backend driving the `docker` command line
#[derive(Debug, Clone)]
pub struct DockerCliBackend {
    program: String,
}

impl DockerCliBackend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check if the CLI can be spawned at all
    pub fn check_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn build_args(request: &BuildRequest) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--quiet".to_string(),
            "--tag".to_string(),
            request.tag.clone(),
        ];
        // "-" reads the whole context from stdin; a plain path would not
        args.push("-".to_string());
        args
    }
}

impl Default for DockerCliBackend {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl BuildBackend for DockerCliBackend {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        let mut command = Command::new(&self.program);
        // Own process group: a terminal Ctrl+C reaches us, not the build
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let mut child = command
            .args(Self::build_args(request))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BuildError::Unavailable(format!("{}: {}", self.program, e)))?;

        // Feed stdin from its own thread so a chatty child can't deadlock us
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BuildError::Unavailable("stdin not captured".to_string()))?;
        let archive = request.archive.clone();
        let writer = std::thread::spawn(move || stdin.write_all(&archive));

        let output = child.wait_with_output()?;
        let write_result = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));

        if !output.status.success() {
            return Err(BuildError::Rejected {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        write_result?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let image_id = stdout
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
            .unwrap_or(request.tag.as_str())
            .to_string();

        Ok(BuildOutcome { image_id })
    }
}
