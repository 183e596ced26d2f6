//! Integration test infrastructure for declarative configuration managers
//!
//! Provides:
//! - An in-memory device implementing both capability traits
//! - Test fixtures and scenarios for LLDP global configuration
//! - Command-stream verification helpers

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
