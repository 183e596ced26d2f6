//! Common infrastructure for declarative network configuration managers.
//!
//! This crate provides shared functionality for feature managers that
//! converge a device towards a desired configuration:
//!
//! - [`device`]: Narrow capability traits for reading facts and applying commands
//! - [`command`]: The [`Command`] directive type and [`ReconciliationMode`]
//! - [`shell`]: Shell command execution with proper quoting
//! - [`cli`]: [`ShellCli`], an on-box CLI transport implementing both capabilities
//! - [`error`]: Error types shared by all managers
//!
//! # Architecture
//!
//! Feature managers follow this pattern:
//!
//! 1. Fetch the current state of the feature through a [`FactCollector`]
//! 2. Diff it against the desired state under a [`ReconciliationMode`]
//! 3. Render the delta as an ordered list of [`Command`]s
//! 4. Hand the list to a [`CommandSink`] and report before/after state
//!
//! # Example
//!
//! ```ignore
//! use netcfg_common::{CommandSink, NetCfgResult, ShellCli};
//!
//! async fn set_timer(cli: &ShellCli) -> NetCfgResult<()> {
//!     cli.apply_commands(&["lldp timer 30".to_string()]).await
//! }
//! ```

pub mod cli;
pub mod command;
pub mod device;
pub mod error;
pub mod shell;

// Re-export commonly used items at crate root
pub use cli::ShellCli;
pub use command::{command_strings, Command, ReconciliationMode};
pub use device::{CommandSink, FactCollector, RunningConfigSource};
pub use error::{NetCfgError, NetCfgResult};
