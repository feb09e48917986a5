#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{ExitStatus, Stdio},
    time::Duration,
};

use anyhow::{Context, Result};
use itertools::Itertools;
use tokio::{
    process::{Child, Command},
    time::{sleep, timeout},
};

/// Workers spawned by `sync-rpc` that outlive the student server.
const SYNC_RPC_WORKER: &str = "node_modules/sync-rpc/lib/worker.js";

/// Drop guard that terminates a spawned child process if callers forget to
/// await it.
struct ChildDropGuard(Option<Child>);

impl ChildDropGuard {
    /// Wraps the provided child process with the drop guard.
    fn new(child: Child) -> Self {
        Self(Some(child))
    }

    /// Returns a mutable reference to the underlying child process.
    fn child_mut(&mut self) -> anyhow::Result<&mut Child> {
        self.0
            .as_mut()
            .context("child process already taken from guard")
    }

    /// Prevents the guard from killing the process on drop.
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for ChildDropGuard {
    fn drop(&mut self) {
        if let Some(child) = self.0.as_mut() {
            let _ = child.start_kill();
        }
    }
}

/// How a subprocess run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The process exited on its own.
    Exited(ExitStatus),
    /// The deadline passed and the process was killed.
    TimedOut,
}

impl RunOutcome {
    /// True if the process exited with status 0.
    pub fn success(&self) -> bool {
        matches!(self, RunOutcome::Exited(status) if status.success())
    }
}

/// Runs a command with stdout/stderr passed through to ours, so tool output
/// lands in the CI log as it is produced.
///
/// The child is killed if `deadline` elapses first.
pub async fn run_inherited(
    program: impl AsRef<OsStr>,
    args: &[OsString],
    cwd: Option<&Path>,
    deadline: Option<Duration>,
) -> Result<RunOutcome> {
    let program = program.as_ref();
    tracing::debug!(
        "running {} {}",
        program.to_string_lossy(),
        args.iter().map(|a| a.to_string_lossy()).join(" ")
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let guard = ChildDropGuard::new(
        cmd.spawn()
            .with_context(|| format!("failed to spawn {}", program.to_string_lossy()))?,
    );

    let wait_future = async move {
        let mut guard = guard;
        let status = guard
            .child_mut()?
            .wait()
            .await
            .context("failed to wait on process")?;
        guard.disarm();
        Ok::<ExitStatus, anyhow::Error>(status)
    };

    match deadline {
        Some(limit) => match timeout(limit, wait_future).await {
            Ok(status) => Ok(RunOutcome::Exited(status?)),
            Err(_) => Ok(RunOutcome::TimedOut),
        },
        None => Ok(RunOutcome::Exited(wait_future.await?)),
    }
}

/// The student server, owned for the duration of one test stage.
///
/// The server runs in its own process group so that `stop` reaches every
/// process it spawned. A guard dropped without `stop` kills the whole group.
pub struct ServerGuard {
    /// The server process, `None` once stopped.
    child: Option<Child>,
}

impl ServerGuard {
    /// Spawns the server in a new process group.
    pub fn start(program: impl AsRef<OsStr>, args: &[OsString], cwd: Option<&Path>) -> Result<Self> {
        let program = program.as_ref();
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());

        #[cfg(unix)]
        cmd.process_group(0);

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to start server with {}", program.to_string_lossy()))?;
        tracing::info!("Started server (pid {})", child.id().unwrap_or_default());

        Ok(Self { child: Some(child) })
    }

    /// Waits the fixed boot delay, or returns early if the server has
    /// already exited.
    pub async fn await_ready(&mut self, boot: Duration) -> Result<()> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        tokio::select! {
            _ = sleep(boot) => Ok(()),
            status = child.wait() => {
                let status = status.context("failed to wait on server")?;
                tracing::warn!("Server exited during boot with {status}");
                Ok(())
            }
        }
    }

    /// Clears lingering `sync-rpc` workers, interrupts the server's process
    /// group, then gives everything `grace` to exit.
    pub async fn stop(mut self, grace: Duration) -> Result<()> {
        kill_sync_workers().await;

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        interrupt_group(&mut child);
        sleep(grace).await;

        if child.try_wait().context("failed to poll server")?.is_none() {
            tracing::warn!("Server still running after {grace:?}, killing it");
            kill_group(&mut child);
            child.wait().await.context("failed to reap server")?;
        }

        Ok(())
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            kill_group(child);
        }
    }
}

/// Sends SIGINT to the child's process group.
#[cfg(unix)]
fn interrupt_group(child: &mut Child) {
    use nix::{
        sys::signal::{Signal, killpg},
        unistd::Pid,
    };

    if let Some(pid) = child.id()
        && let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGINT)
    {
        tracing::warn!("Could not interrupt server process group {pid}: {e}");
    }
}

/// Without process groups the best we can do is kill the child itself.
#[cfg(not(unix))]
fn interrupt_group(child: &mut Child) {
    let _ = child.start_kill();
}

/// Sends SIGKILL to the child's process group.
#[cfg(unix)]
fn kill_group(child: &mut Child) {
    use nix::{
        sys::signal::{Signal, killpg},
        unistd::Pid,
    };

    match child.id() {
        Some(pid) => {
            let _ = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL);
        }
        None => {
            let _ = child.start_kill();
        }
    }
}

/// Kills the child process.
#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    let _ = child.start_kill();
}

/// Kills `sync-rpc` workers left behind by the student server.
async fn kill_sync_workers() {
    let result = Command::new("pkill")
        .args(["-f", SYNC_RPC_WORKER])
        .stdin(Stdio::null())
        .status()
        .await;

    if let Err(e) = result {
        tracing::debug!("pkill unavailable: {e}");
    }
}
