//! Verification helpers for testing configuration managers
//!
//! Provides assertion helpers over the command stream a device received

use thiserror::Error;

use netcfg_common::command::is_negation;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected command '{expected}' not found in {actual:?}")]
    CommandMissing {
        expected: String,
        actual: Vec<String>,
    },

    #[error("Unexpected command '{command}' was executed")]
    UnexpectedCommand { command: String },

    #[error("Expected {expected} commands, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Command sequence mismatch: expected {expected:?}, got {actual:?}")]
    SequenceMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Command execution verifier
pub struct CommandVerifier {
    captured_commands: Vec<String>,
}

impl CommandVerifier {
    /// Create a new command verifier
    pub fn new(captured_commands: Vec<String>) -> Self {
        Self { captured_commands }
    }

    /// Verify that exactly this command was executed
    pub fn assert_command_executed(&self, expected: &str) -> VerifyResult<()> {
        if self.captured_commands.iter().any(|cmd| cmd == expected) {
            Ok(())
        } else {
            Err(VerificationError::CommandMissing {
                expected: expected.to_string(),
                actual: self.captured_commands.clone(),
            })
        }
    }

    /// Verify that no executed command contains `fragment`
    pub fn assert_command_not_executed(&self, fragment: &str) -> VerifyResult<()> {
        match self.captured_commands.iter().find(|cmd| cmd.contains(fragment)) {
            Some(cmd) => Err(VerificationError::UnexpectedCommand {
                command: cmd.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Verify the number of commands executed
    pub fn assert_command_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.captured_commands.len();
        if actual != expected {
            Err(VerificationError::CountMismatch { expected, actual })
        } else {
            Ok(())
        }
    }

    /// Verify the exact command sequence, order included
    pub fn assert_sequence<S: AsRef<str>>(&self, expected: &[S]) -> VerifyResult<()> {
        let expected: Vec<String> = expected.iter().map(|s| s.as_ref().to_string()).collect();
        if expected != self.captured_commands {
            return Err(VerificationError::SequenceMismatch {
                expected,
                actual: self.captured_commands.clone(),
            });
        }
        Ok(())
    }

    /// Verify that every command removes or defaults a setting
    pub fn assert_only_removals(&self) -> VerifyResult<()> {
        match self.captured_commands.iter().find(|cmd| !is_negation(cmd)) {
            Some(cmd) => Err(VerificationError::UnexpectedCommand {
                command: cmd.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Get all captured commands
    pub fn captured_commands(&self) -> &[String] {
        &self.captured_commands
    }
}
