// src/shell.rs

//! Subprocess and filesystem services used by the builders.
//!
//! Builders never touch `tokio::process` or `tokio::fs` directly; they go
//! through a [`Shell`] so tests can swap in a recording fake that never
//! spawns anything.

use std::fmt::Debug;
use std::future::Future;
use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::env::Environment;
use crate::errors::Result;

/// Boxed future returned by the shell and builder seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Services a builder needs from the outside world.
pub trait Shell: Send + Sync + Debug {
    /// Run `argv` in `cwd` with exactly the variables in `env`.
    ///
    /// Returns `true` if the process exited successfully. Spawn failures and
    /// non-zero exits are logged and reported as `false`, never as errors.
    fn call_build<'a>(
        &'a self,
        argv: &'a [String],
        cwd: &'a Path,
        env: &'a Environment,
    ) -> BoxFuture<'a, bool>;

    /// Create `path` and any missing parents.
    fn makedirs<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>>;

    /// Recursively remove `path`. A missing path is not an error.
    fn rmtree<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>>;
}

/// Shell backed by real processes and the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct RealShell;

impl RealShell {
    pub fn new() -> Self {
        Self
    }
}

impl Shell for RealShell {
    fn call_build<'a>(
        &'a self,
        argv: &'a [String],
        cwd: &'a Path,
        env: &'a Environment,
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            match run_command(argv, cwd, env).await {
                Ok(success) => success,
                Err(err) => {
                    error!(cmd = %argv.join(" "), error = %err, "build command could not be run");
                    false
                }
            }
        })
    }

    fn makedirs<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            tokio::fs::create_dir_all(path).await?;
            Ok(())
        })
    }

    fn rmtree<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            match tokio::fs::remove_dir_all(path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "removed directory tree");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %path.display(), "nothing to remove");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        })
    }
}

async fn run_command(argv: &[String], cwd: &Path, env: &Environment) -> anyhow::Result<bool> {
    let (program, args) = argv
        .split_first()
        .context("refusing to run an empty command line")?;

    info!(cmd = %argv.join(" "), cwd = %cwd.display(), "running build command");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .env_clear()
        .envs(env.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}' in {:?}", program, cwd))?;

    // Forward output line by line so the user sees progress as it happens.
    let stdout_task = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(forward_output(stdout, program.clone(), OutputStream::Stdout)));
    let stderr_task = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(forward_output(stderr, program.clone(), OutputStream::Stderr)));

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for '{}'", program))?;

    for task in [stdout_task, stderr_task].into_iter().flatten() {
        if let Err(err) = task.await {
            warn!(tool = %program, error = %err, "output forwarder did not finish");
        }
    }

    let code = status.code().unwrap_or(-1);
    if status.success() {
        debug!(cmd = %program, exit_code = code, "build command finished");
    } else {
        error!(cmd = %argv.join(" "), exit_code = code, "build command failed");
    }

    Ok(status.success())
}

#[derive(Debug, Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

/// Log every line the child writes until the pipe closes.
///
/// Lines are split on raw bytes; tools are free to print non-UTF-8 output,
/// and the pipe must be drained regardless or the child blocks on a full pipe
/// (or dies of SIGPIPE once the read end is dropped).
async fn forward_output<R>(reader: R, tool: String, stream: OutputStream)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                match stream {
                    OutputStream::Stdout => info!(tool = %tool, "{}", line),
                    OutputStream::Stderr => warn!(tool = %tool, "{}", line),
                }
            }
            Err(err) => {
                warn!(tool = %tool, error = %err, "stopped reading tool output");
                break;
            }
        }
    }
}
