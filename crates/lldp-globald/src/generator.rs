//! Command generation from a delta.
//!
//! Each changed attribute contributes exactly one command, and commands
//! follow canonical attribute order. No attribute in the schema declares a
//! dependency on another, so no reordering of negations is needed.

use netcfg_common::Command;

use crate::diff::{Change, Delta};

/// Renders `delta` as an ordered command list.
pub fn generate(delta: &Delta) -> Vec<Command> {
    delta
        .changes()
        .map(|(attr, change)| {
            let spec = attr.spec();
            match change {
                Change::Set(value) => spec.set_command(value),
                Change::Remove => spec.remove_command(),
            }
        })
        .collect()
}
