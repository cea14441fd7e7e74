//! Subprocess execution for the external scraping executable.
//!
//! The executable is launched directly (never through a shell) with the
//! argument vector passed as discrete tokens, its working directory pinned to
//! its own install directory, and a hard wall-clock timeout. Whatever bytes
//! reached stdout/stderr before termination are preserved for the classifier.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};

use crate::config::ServerConfig;

/// Hard wall-clock limit for one subprocess run (600,000 ms).
pub const EXECUTION_TIMEOUT: Duration = Duration::from_millis(600_000);

/// Bytes captured from the subprocess streams up to the point of
/// termination.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// How a subprocess run ended.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Process ran to completion with an exit code (0 or otherwise).
    Exited { code: i32, captured: Captured },
    /// Process was terminated by a signal before producing an exit code.
    Signaled {
        signal: Option<i32>,
        captured: Captured,
    },
    /// Wall-clock limit fired; the process was forcibly killed.
    TimedOut {
        elapsed: Duration,
        captured: Captured,
    },
    /// The process never started (missing executable, permissions, ...).
    SpawnFailed { error: std::io::Error },
}

/// Runs the configured executable with a bounded timeout.
#[derive(Debug, Clone)]
pub struct Invoker {
    exe_path: PathBuf,
    exe_dir: PathBuf,
    timeout: Duration,
}

impl Invoker {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            exe_path: config.exe_path().to_path_buf(),
            exe_dir: config.exe_dir().to_path_buf(),
            timeout: EXECUTION_TIMEOUT,
        }
    }

    /// Override the hard timeout. Intended for tests; production runs use
    /// [`EXECUTION_TIMEOUT`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    /// Spawn the executable with `args` and wait for it to finish or hit the
    /// timeout. Never returns an `Err`: every failure mode is a
    /// [`ProcessOutcome`] variant.
    pub async fn run(&self, args: &[String]) -> ProcessOutcome {
        let mut command = Command::new(&self.exe_path);
        command
            .args(args)
            .current_dir(&self.exe_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(error) => return ProcessOutcome::SpawnFailed { error },
        };

        // Drain both pipes concurrently with the wait so a chatty process
        // cannot deadlock on a full pipe buffer, and so partial output
        // survives a kill.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_task = tokio::spawn(drain(stdout_pipe));
        let stderr_task = tokio::spawn(drain(stderr_pipe));

        let waited = tokio::time::timeout(self.timeout, child.wait()).await;

        match waited {
            Ok(Ok(status)) => {
                let captured = Captured {
                    stdout: stdout_task.await.unwrap_or_default(),
                    stderr: stderr_task.await.unwrap_or_default(),
                };
                match status.code() {
                    Some(code) => ProcessOutcome::Exited { code, captured },
                    None => ProcessOutcome::Signaled {
                        signal: termination_signal(&status),
                        captured,
                    },
                }
            }
            Ok(Err(error)) => {
                reap(&mut child).await;
                ProcessOutcome::SpawnFailed { error }
            }
            Err(_) => {
                reap(&mut child).await;
                // The kill closes the pipes, so the drain tasks finish with
                // whatever was written before termination.
                ProcessOutcome::TimedOut {
                    elapsed: started.elapsed(),
                    captured: Captured {
                        stdout: stdout_task.await.unwrap_or_default(),
                        stderr: stderr_task.await.unwrap_or_default(),
                    },
                }
            }
        }
    }
}

async fn drain<R>(pipe: Option<R>) -> Vec<u8>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buffer).await;
    }
    buffer
}

async fn reap(child: &mut Child) {
    if let Err(error) = child.start_kill() {
        tracing::debug!(%error, "kill request for scraping subprocess failed");
    }
    let _ = child.wait().await;
}

#[cfg(unix)]
fn termination_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}
