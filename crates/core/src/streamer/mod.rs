//! Run a script and forward its merged output, line by line, to a sink.
//!
//! The wire shape of a run is fixed: one banner line, every line the child
//! writes (stdout and stderr merged, in write order), then one terminal line
//! carrying the exit code. A child that cannot be spawned produces the banner
//! and a failure line instead.
//!
//! There is no timeout and no cancellation. If the sink goes away mid-run the
//! child is detached, not killed.

mod output;
pub mod sink;

use std::process::ExitStatus;

use futures::StreamExt;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::CoreError;

pub use sink::{LineSink, SinkClosed};

/// Exit code reported when the child's status carries neither a code nor a
/// signal.
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Parameters of a single streaming session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchRequest {
    /// Interpreter executable. No default: the caller must supply one.
    #[serde(rename = "python_path")]
    pub interpreter_path: String,
    /// Script passed as the interpreter's first argument.
    pub script_path: String,
    /// Remaining arguments, in order.
    #[serde(default)]
    pub args: Vec<String>,
}

impl LaunchRequest {
    /// The command as shown to the user: every token joined by a space.
    pub fn command_line(&self) -> String {
        std::iter::once(self.interpreter_path.as_str())
            .chain(std::iter::once(self.script_path.as_str()))
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter_path);
        cmd.arg(&self.script_path).args(&self.args);
        cmd
    }
}

/// How a streaming session ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The child ran to completion and the terminal line was delivered.
    Exited { code: i32 },
    /// The child could not be started; a failure line was sent instead.
    SpawnFailed,
    /// The sink closed before the terminal line could be delivered.
    Disconnected,
}

// ---------------------------------------------------------------------------
// Wire lines
// ---------------------------------------------------------------------------

pub fn banner_line(command_line: &str) -> String {
    format!("🚀 Running: {command_line}\n")
}

pub fn exit_line(code: i32) -> String {
    format!("\n✅ 进程结束 (返回码 {code})")
}

pub fn spawn_failure_line(err: &CoreError) -> String {
    format!("❌ 启动失败: {err}")
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// Run `request` and forward everything it prints to `sink`.
///
/// Lines are forwarded one at a time in production order. Closing the sink
/// is left to the caller.
pub async fn stream<S: LineSink>(request: &LaunchRequest, sink: &mut S) -> RunOutcome {
    let command_line = request.command_line();

    if sink.send_line(banner_line(&command_line)).await.is_err() {
        return RunOutcome::Disconnected;
    }

    let (mut child, mut lines) = match output::spawn_merged(request.to_command()) {
        Ok(spawned) => spawned,
        Err(e) => {
            let err = CoreError::Spawn(e);
            tracing::warn!(command = %command_line, error = %err, "Process failed to start");
            let _ = sink.send_line(spawn_failure_line(&err)).await;
            return RunOutcome::SpawnFailed;
        }
    };

    let pid = child.id();
    tracing::info!(?pid, command = %command_line, "Process started");

    let mut forwarded: usize = 0;
    while let Some(line) = lines.next().await {
        if sink.send_line(line).await.is_err() {
            tracing::warn!(?pid, forwarded, "Sink closed mid-run, detaching process");
            return RunOutcome::Disconnected;
        }
        forwarded += 1;
    }

    let code = match child.wait().await {
        Ok(status) => exit_code(status),
        Err(e) => {
            tracing::warn!(?pid, error = %e, "Failed to collect exit status");
            UNKNOWN_EXIT_CODE
        }
    };
    tracing::info!(?pid, exit_code = code, lines = forwarded, "Process finished");

    if sink.send_line(exit_line(code)).await.is_err() {
        return RunOutcome::Disconnected;
    }
    RunOutcome::Exited { code }
}

/// Exit code of a finished child; a signal `n` is reported as `-n`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    UNKNOWN_EXIT_CODE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
