//! Error types for configuration manager operations.
//!
//! This module defines the error types used throughout the netcfg crates.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use thiserror::Error;

/// Result type alias for netcfg operations.
pub type NetCfgResult<T> = Result<T, NetCfgError>;

/// Errors that can occur while collecting, reconciling or applying configuration.
#[derive(Debug, Error)]
pub enum NetCfgError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// A collaborator gave up waiting on the device.
    #[error("Command '{command}' timed out after {after_ms}ms")]
    Timeout {
        /// The command that was in flight.
        command: String,
        /// Elapsed time before giving up.
        after_ms: u64,
    },

    /// A running-config line for a managed attribute could not be understood.
    #[error("Failed to parse running-config line '{line}': {message}")]
    Parse {
        /// The offending line, trimmed.
        line: String,
        /// Error message.
        message: String,
    },

    /// Desired-state validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// The fact collector could not retrieve the current state.
    #[error("Failed to fetch current configuration: {source}")]
    Fetch {
        /// The collector error.
        #[source]
        source: Box<NetCfgError>,
    },

    /// The command sink rejected the command batch.
    #[error("Device rejected batch of {attempted} command(s): {source}")]
    Apply {
        /// Number of commands in the rejected batch.
        attempted: usize,
        /// The sink error.
        #[source]
        source: Box<NetCfgError>,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl NetCfgError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a parse error for a running-config line.
    pub fn parse(line: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            line: line.into(),
            message: message.into(),
        }
    }

    /// Wraps a collector failure.
    pub fn fetch(source: NetCfgError) -> Self {
        Self::Fetch {
            source: Box::new(source),
        }
    }

    /// Wraps a sink failure for a batch of `attempted` commands.
    pub fn apply(attempted: usize, source: NetCfgError) -> Self {
        Self::Apply {
            attempted,
            source: Box::new(source),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient transport condition
    /// that a caller may choose to retry.
    ///
    /// Wrapped errors are classified by their source.
    pub fn is_transient(&self) -> bool {
        match self {
            NetCfgError::Timeout { .. } | NetCfgError::ShellCommandFailed { .. } => true,
            NetCfgError::Fetch { source } | NetCfgError::Apply { source, .. } => {
                source.is_transient()
            }
            _ => false,
        }
    }
}
