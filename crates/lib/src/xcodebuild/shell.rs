//! Process spawning for `xcodebuild`.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::types::ExecutorError;

fn display_command(program: &str, args: &[String]) -> String {
  std::iter::once(program)
    .chain(args.iter().map(String::as_str))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Run a command and capture its stdout.
///
/// # Returns
///
/// The stdout of the command on success, with trailing whitespace removed.
pub async fn run_captured(program: &str, args: &[String]) -> Result<String, ExecutorError> {
  let cmd = display_command(program, args);
  debug!(cmd = %cmd, "spawning process");

  let output = Command::new(program)
    .args(args)
    .stdin(Stdio::null())
    .output()
    .await?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(ExecutorError::CommandFailed {
      cmd,
      code: output.status.code(),
    });
  }

  Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
}

/// Run a command with output going straight to the terminal.
///
/// Returns whether the command exited successfully.
pub async fn run_inherited(program: &str, args: &[String]) -> Result<bool, ExecutorError> {
  let cmd = display_command(program, args);
  info!(cmd = %cmd, "executing command");

  let status = Command::new(program)
    .args(args)
    .stdin(Stdio::null())
    .stdout(Stdio::inherit())
    .stderr(Stdio::inherit())
    .status()
    .await?;

  debug!(code = ?status.code(), "command exited");
  Ok(status.success())
}
