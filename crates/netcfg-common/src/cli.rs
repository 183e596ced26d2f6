//! On-box CLI transport.
//!
//! [`ShellCli`] drives the device CLI binary (`FastCli` on EOS) and
//! implements both capability traits: reads go through
//! `FastCli -p <priv> -c "<show>"`, writes wrap the command list in a
//! `configure` / `end` session passed as a single argument.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use crate::device::{CommandSink, RunningConfigSource};
use crate::error::{NetCfgError, NetCfgResult};
use crate::shell::{self, shellquote, FASTCLI_CMD};

/// Default privilege level for configuration sessions.
pub const DEFAULT_PRIVILEGE: u8 = 15;

/// CLI transport backed by local process execution.
#[derive(Debug, Clone)]
pub struct ShellCli {
    cli_path: String,
    privilege: u8,
    timeout: Option<Duration>,
}

impl ShellCli {
    /// Creates a transport using the default CLI path and privilege level.
    pub fn new() -> Self {
        Self {
            cli_path: FASTCLI_CMD.to_string(),
            privilege: DEFAULT_PRIVILEGE,
            timeout: None,
        }
    }

    /// Overrides the CLI binary path.
    pub fn with_cli_path(mut self, cli_path: impl Into<String>) -> Self {
        self.cli_path = cli_path.into();
        self
    }

    /// Overrides the privilege level passed with `-p`.
    pub fn with_privilege(mut self, privilege: u8) -> Self {
        self.privilege = privilege;
        self
    }

    /// Bounds every CLI invocation to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shell command line used to run a show command.
    pub fn show_command_line(&self, show_command: &str) -> String {
        format!(
            "{} -p {} -c {}",
            shellquote(&self.cli_path),
            self.privilege,
            shellquote(show_command)
        )
    }

    /// Session payload for a configuration batch.
    pub fn config_session(commands: &[String]) -> String {
        let mut session = String::from("configure\n");
        for command in commands {
            session.push_str(command);
            session.push('\n');
        }
        session.push_str("end");
        session
    }
}

impl Default for ShellCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunningConfigSource for ShellCli {
    #[instrument(skip(self))]
    async fn show(&self, show_command: &str) -> NetCfgResult<String> {
        let cmd = self.show_command_line(show_command);
        shell::exec_or_throw(&cmd, self.timeout).await
    }
}

#[async_trait]
impl CommandSink for ShellCli {
    #[instrument(skip(self, commands), fields(count = commands.len()))]
    async fn apply_commands(&self, commands: &[String]) -> NetCfgResult<()> {
        let session = Self::config_session(commands);
        let privilege = self.privilege.to_string();
        let args = ["-p", privilege.as_str(), "-c", session.as_str()];

        let result = shell::exec_args(&self.cli_path, &args, self.timeout).await?;
        // FastCli exits 0 even when a line is rejected; errors are reported inline.
        if result.success() && result.stdout.lines().any(|l| l.trim_start().starts_with('%')) {
            return Err(NetCfgError::ShellCommandFailed {
                command: self.cli_path.clone(),
                exit_code: result.exit_code,
                output: result.stdout,
            });
        }
        result.into_stdout(&self.cli_path)?;
        info!("Applied {} command(s) via {}", commands.len(), self.cli_path);
        Ok(())
    }
}
