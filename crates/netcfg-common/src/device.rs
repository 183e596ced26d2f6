//! Narrow capability interfaces towards the device.
//!
//! Reconciliation never talks to a device directly. It reads through a
//! [`FactCollector`] and writes through a [`CommandSink`]; neither knows
//! about the other, and a component depends only on the one it needs.

use async_trait::async_trait;

use crate::error::NetCfgResult;

/// Read-only access to the raw running configuration.
///
/// Implementations return the text the device prints for `show_command`.
#[async_trait]
pub trait RunningConfigSource: Send + Sync {
    /// Returns the device output for a read-only show command.
    async fn show(&self, show_command: &str) -> NetCfgResult<String>;
}

/// Produces the current state of one managed feature as a typed model.
///
/// Fetching must be free of side effects: no configuration commands are
/// issued and repeated calls against an unchanged device return equal values.
#[async_trait]
pub trait FactCollector<T>: Send + Sync {
    /// Fetches the current configuration, leaving unmanaged attributes absent.
    async fn fetch_current(&self) -> NetCfgResult<T>;
}

/// Applies an ordered command list to the device.
///
/// A failure means at least one command was rejected. No partial-application
/// guarantee is made; any rollback is the implementation's business.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Executes `commands` in order.
    async fn apply_commands(&self, commands: &[String]) -> NetCfgResult<()>;
}
