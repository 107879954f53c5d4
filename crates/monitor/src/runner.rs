//! External command execution.
//!
//! Commands are spawned directly (no shell) and only their stdout is
//! kept. Failures are never fatal: a command that cannot be spawned or
//! exits non-zero simply yields whatever output it produced, usually none.

use std::process::Stdio;

use async_trait::async_trait;
use jobwatch_core::CommandSpec;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Source of raw command output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command`, optionally piping its stdout through `filter`, and
    /// return the final stdout as text.
    async fn run(&self, command: &CommandSpec, filter: Option<&CommandSpec>) -> String;
}

/// Runs commands as child processes of the monitor.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandSpec, filter: Option<&CommandSpec>) -> String {
        let output = capture(command, None).await;
        match filter {
            Some(filter) => capture(filter, Some(output.into_bytes())).await,
            None => output,
        }
    }
}

/// Spawn `spec`, feed it `stdin` if given, and collect its stdout.
async fn capture(spec: &CommandSpec, stdin: Option<Vec<u8>>) -> String {
    debug!(command = %spec, "executing command");

    let mut child = match Command::new(&spec.program)
        .args(&spec.args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!(command = %spec, error = %e, "failed to spawn command, treating as empty output");
            return String::new();
        }
    };

    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        // Written off-task: the filter's stdout is only drained below.
        // Dropping the pipe closes it.
        tokio::spawn(async move {
            if let Err(e) = pipe.write_all(&input).await {
                debug!(error = %e, "filter closed stdin early");
            }
        });
    }

    let output = match child.wait_with_output().await {
        Ok(output) => output,
        Err(e) => {
            warn!(command = %spec, error = %e, "command execution error, treating as empty output");
            return String::new();
        }
    };

    if !output.status.success() {
        debug!(
            command = %spec,
            exit_code = output.status.code().unwrap_or(-1),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "command returned non-zero exit code"
        );
    }

    String::from_utf8_lossy(&output.stdout).into_owned()
}
