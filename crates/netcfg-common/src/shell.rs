//! Shell command execution utilities.
//!
//! This module provides shell command execution with proper quoting
//! to prevent command injection, plus direct argv execution for payloads
//! that must reach the program byte-for-byte (multi-line CLI batches).
//!
//! # Example
//!
//! ```ignore
//! use netcfg_common::shell::{self, FASTCLI_CMD, shellquote};
//!
//! let cmd = format!("{} -p 15 -c {}", FASTCLI_CMD, shellquote("show lldp"));
//! let result = shell::exec(&cmd, None).await?;
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::error::{NetCfgError, NetCfgResult};

/// Path to the on-box EOS CLI used to read and write configuration.
pub const FASTCLI_CMD: &str = "/usr/bin/FastCli";

/// Shell used for [`exec`].
pub const SH_CMD: &str = "/bin/sh";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Quotes a string for safe use in shell commands.
///
/// This function wraps the string in double quotes and escapes any
/// characters that have special meaning inside double quotes:
/// - `$` (variable expansion)
/// - `` ` `` (command substitution)
/// - `"` (quote termination)
/// - `\` (escape character)
/// - newline (command termination)
///
/// # Example
///
/// ```
/// use netcfg_common::shell::shellquote;
///
/// assert_eq!(shellquote("simple"), "\"simple\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// assert_eq!(shellquote("show running-config | section lldp"), "\"show running-config | section lldp\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The stdout output, trimmed.
    pub stdout: String,
    /// The stderr output, trimmed.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Converts a non-zero exit into [`NetCfgError::ShellCommandFailed`].
    pub fn into_stdout(self, command: &str) -> NetCfgResult<String> {
        if self.success() {
            Ok(self.stdout)
        } else {
            Err(NetCfgError::ShellCommandFailed {
                command: command.to_string(),
                exit_code: self.exit_code,
                output: self.combined_output(),
            })
        }
    }
}

async fn run(mut child: Command, cmd_line: &str, timeout: Option<Duration>) -> NetCfgResult<ExecResult> {
    child
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = child.output();
    let output: std::io::Result<Output> = match timeout {
        Some(limit) => match tokio::time::timeout(limit, output).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(command = %cmd_line, timeout_ms = limit.as_millis() as u64, "Command timed out");
                return Err(NetCfgError::Timeout {
                    command: cmd_line.to_string(),
                    after_ms: limit.as_millis() as u64,
                });
            }
        },
        None => output.await,
    };

    let output = output.map_err(|e| NetCfgError::ShellExec {
        command: cmd_line.to_string(),
        source: e,
    })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let result = ExecResult {
        exit_code,
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    };

    if result.success() {
        tracing::trace!(command = %cmd_line, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd_line,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a shell command asynchronously through `/bin/sh -c`.
///
/// A `timeout` of `None` waits for the command to finish however long it takes.
/// On timeout the child is killed and [`NetCfgError::Timeout`] is returned.
pub async fn exec(cmd: &str, timeout: Option<Duration>) -> NetCfgResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let mut child = Command::new(SH_CMD);
    child.arg("-c").arg(cmd);
    run(child, cmd, timeout).await
}

/// Executes a program with explicit arguments, bypassing the shell.
///
/// Arguments are passed verbatim, so embedded newlines survive.
pub async fn exec_args(
    program: &str,
    args: &[&str],
    timeout: Option<Duration>,
) -> NetCfgResult<ExecResult> {
    let cmd_line = format!("{} {}", program, args.join(" "));
    tracing::debug!(command = %cmd_line, "Executing program");

    let mut child = Command::new(program);
    child.args(args);
    run(child, &cmd_line, timeout).await
}

/// Executes a shell command and fails on non-zero exit.
///
/// Returns the trimmed stdout on success.
pub async fn exec_or_throw(cmd: &str, timeout: Option<Duration>) -> NetCfgResult<String> {
    exec(cmd, timeout).await?.into_stdout(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellquote_simple() {
        assert_eq!(shellquote("simple"), "\"simple\"");
        assert_eq!(shellquote("lldp"), "\"lldp\"");
        assert_eq!(shellquote("15"), "\"15\"");
    }

    #[test]
    fn test_shellquote_special_chars() {
        // Dollar sign (variable expansion)
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");

        // Backtick (command substitution)
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");

        // Double quote
        assert_eq!(shellquote("say \"hello\""), "\"say \\\"hello\\\"\"");

        // Backslash
        assert_eq!(shellquote("path\\to"), "\"path\\\\to\"");

        // Newline
        assert_eq!(shellquote("line1\nline2"), "\"line1\\\nline2\"");
    }

    #[test]
    fn test_shellquote_pipe_is_literal() {
        assert_eq!(
            shellquote("show running-config | section lldp"),
            "\"show running-config | section lldp\""
        );
    }

    #[test]
    fn test_shellquote_empty() {
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_exec_result_failure() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "".to_string(),
            stderr: "% Invalid input".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "% Invalid input");
        match result.into_stdout("lldp bogus") {
            Err(NetCfgError::ShellCommandFailed { exit_code, output, .. }) => {
                assert_eq!(exit_code, 1);
                assert_eq!(output, "% Invalid input");
            }
            other => panic!("Expected ShellCommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo hello", None).await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_exec_failure() {
        let result = exec("exit 42", None).await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_args_keeps_newlines() {
        let result = exec_args("/bin/echo", &["configure\nlldp timer 5\nend"], None)
            .await
            .unwrap();
        assert_eq!(result.stdout, "configure\nlldp timer 5\nend");
    }

    #[tokio::test]
    async fn test_exec_timeout() {
        let err = exec("sleep 5", Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, NetCfgError::Timeout { after_ms: 50, .. }));
    }

    #[tokio::test]
    async fn test_exec_args_timeout_names_command() {
        match exec_args("/bin/sleep", &["5"], Some(Duration::from_millis(50))).await {
            Err(NetCfgError::Timeout { command, after_ms }) => {
                assert_eq!(command, "/bin/sleep 5");
                assert_eq!(after_ms, 50);
            }
            other => panic!("Expected Timeout error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exec_or_throw_failure() {
        match exec_or_throw("exit 1", None).await {
            Err(NetCfgError::ShellCommandFailed { exit_code, .. }) => assert_eq!(exit_code, 1),
            other => panic!("Expected ShellCommandFailed error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exec_missing_program() {
        let err = exec_args("/nonexistent/FastCli", &["-c", "show"], None)
            .await
            .unwrap_err();
        assert!(matches!(err, NetCfgError::ShellExec { .. }));
    }
}
