//! # lldp-globald - Global LLDP Configuration Manager
//!
//! This crate converges the global LLDP settings of a device to a desired
//! state. Given the desired configuration and the device's running
//! configuration it computes the minimal ordered command list and applies it.
//!
//! ## Responsibilities
//! - Typed model of global LLDP settings (holdtime, reinit, timer, TLV selection)
//! - Parsing `show running-config | section lldp` into that model
//! - Diffing desired against current state in merged, replaced or deleted mode
//! - Rendering the delta as device CLI commands in canonical order
//! - Reporting before/after state, commands and whether anything changed
//!
//! ## Key Features
//! - One declarative attribute table drives diff, commands and parsing
//! - Idempotent: a converged device produces no commands
//! - Device I/O only through the `FactCollector` / `CommandSink` capabilities

pub mod config;
pub mod diff;
pub mod facts;
pub mod generator;
mod lldp_mgr;
pub mod tables;
mod types;

pub use config::TaskSpec;
pub use diff::{diff, Change, Delta};
pub use facts::{parse_running_config, render_running_config, LldpFactCollector};
pub use generator::generate;
pub use lldp_mgr::{AfterState, LldpGlobalMgr, Outcome, ReconcileOptions, ReconcileReport};
pub use tables::{AttrKind, Attribute, AttributeSpec, Tlv, SCHEMA};
pub use types::*;
