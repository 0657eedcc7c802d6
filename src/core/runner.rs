// src/core/runner.rs

use std::future::Future;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::builder::CommandVector;

/// Executes a command vector and returns its output as text.
///
/// Implementations never fail: every problem is reported in-band, so a batch
/// can keep going past a broken tool.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandVector, limit: Duration) -> impl Future<Output = String> + Send;
}

/// Runs commands as local child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &CommandVector, limit: Duration) -> String {
        let Some(program) = command.program() else {
            warn!("Refusing to run an empty command.");
            return "[!] Empty command.\n".to_string();
        };
        info!(command = %command, timeout_secs = limit.as_secs(), "Running tool.");

        let child = Command::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(program, "Tool not installed.");
                return not_installed(program);
            }
            Err(e) => {
                warn!(program, error = %e, "Failed to start tool.");
                return format!("[!] Failed to start {}: {}\n", command, e);
            }
        };

        // Dropping the child on timeout kills it.
        let output = match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(command = %command, error = %e, "Failed to collect tool output.");
                return format!("[!] Error running: {}\n{}\n", command, e);
            }
            Err(_) => {
                warn!(command = %command, "Tool timed out.");
                return timed_out(limit, command);
            }
        };

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            debug!(command = %command, bytes = text.len(), "Tool finished.");
            text
        } else {
            warn!(command = %command, status = %output.status, "Tool exited with failure.");
            failed(command, &text)
        }
    }
}

pub fn not_installed(program: &str) -> String {
    format!("[!] Tool not installed: {program}\n")
}

pub fn timed_out(limit: Duration, command: &CommandVector) -> String {
    format!("[!] Timed out after {limit:?}: {command}\n")
}

pub fn failed(command: &CommandVector, partial_output: &str) -> String {
    format!("[!] Error running: {command}\n{partial_output}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn captures_stdout_and_stderr() {
        let cmd = CommandVector::new(["sh", "-c", "echo out; echo err 1>&2"]);
        let text = ProcessRunner.run(&cmd, LIMIT).await;
        assert_eq!(text, "out\nerr\n");
    }

    #[tokio::test]
    async fn missing_executable_is_reported_in_band() {
        let cmd = CommandVector::new(["definitely-not-a-real-tool-4242", "--help"]);
        let text = ProcessRunner.run(&cmd, LIMIT).await;
        assert_eq!(text, "[!] Tool not installed: definitely-not-a-real-tool-4242\n");
    }

    #[tokio::test]
    async fn timeout_names_limit_and_command() {
        let cmd = CommandVector::new(["sleep", "5"]);
        let text = ProcessRunner.run(&cmd, Duration::from_secs(1)).await;
        assert_eq!(text, "[!] Timed out after 1s: sleep 5\n");

        let short = ProcessRunner.run(&cmd, Duration::from_millis(250)).await;
        assert_eq!(short, "[!] Timed out after 250ms: sleep 5\n");
    }

    #[tokio::test]
    async fn nonzero_exit_keeps_partial_output() {
        let cmd = CommandVector::new(["sh", "-c", "echo partial; exit 3"]);
        let text = ProcessRunner.run(&cmd, LIMIT).await;
        assert_eq!(text, "[!] Error running: sh -c echo partial; exit 3\npartial\n\n");
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let cmd = CommandVector::new(["printf", "ok\\377\\n"]);
        let text = ProcessRunner.run(&cmd, LIMIT).await;
        assert_eq!(text, "ok\u{FFFD}\n");
    }

    #[tokio::test]
    async fn empty_command_is_reported() {
        let text = ProcessRunner.run(&CommandVector::default(), LIMIT).await;
        assert!(text.starts_with("[!]"));
    }
}
