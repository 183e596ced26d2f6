//! Device command and reconciliation mode types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NetCfgError;

/// Prefix that turns an assertion into a negation.
pub const NEGATION_PREFIX: &str = "no ";

/// Prefix that restores a setting to its device default.
pub const DEFAULT_PREFIX: &str = "default ";

/// A single device CLI directive.
///
/// Commands are built once by a generator and never mutated afterwards.
/// The text is kept exactly as the device expects it on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(String);

impl Command {
    /// Builds an assertion, e.g. `lldp holdtime 100`.
    pub fn assert(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    /// Builds a negation, e.g. `no lldp timer`.
    pub fn negate(body: impl AsRef<str>) -> Self {
        Self(format!("{}{}", NEGATION_PREFIX, body.as_ref()))
    }

    /// Builds a restore-to-default directive, e.g. `default lldp tlv-select system-name`.
    pub fn restore_default(body: impl AsRef<str>) -> Self {
        Self(format!("{}{}", DEFAULT_PREFIX, body.as_ref()))
    }

    /// Returns true for `no ...` and `default ...` forms.
    pub fn is_negation(&self) -> bool {
        is_negation(&self.0)
    }

    /// The command text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true if `line` removes or defaults a setting rather than asserting it.
pub fn is_negation(line: &str) -> bool {
    line.starts_with(NEGATION_PREFIX) || line.starts_with(DEFAULT_PREFIX)
}

/// Convenience for handing a command list to string-based sinks.
pub fn command_strings(commands: &[Command]) -> Vec<String> {
    commands.iter().map(|c| c.0.clone()).collect()
}

/// How desired state is reconciled against the running configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationMode {
    /// Only add or change what the desired state names.
    #[default]
    Merged,
    /// Desired state is the complete intended state for managed attributes.
    Replaced,
    /// Remove every managed attribute present on the device.
    Deleted,
}

impl ReconciliationMode {
    /// Returns the mode name as accepted in task files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationMode::Merged => "merged",
            ReconciliationMode::Replaced => "replaced",
            ReconciliationMode::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ReconciliationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconciliationMode {
    type Err = NetCfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merged" => Ok(ReconciliationMode::Merged),
            "replaced" => Ok(ReconciliationMode::Replaced),
            "deleted" => Ok(ReconciliationMode::Deleted),
            other => Err(NetCfgError::invalid_config(
                "state",
                format!("'{}' is not one of merged, replaced, deleted", other),
            )),
        }
    }
}
