//! Delta computation between desired and current configuration.

use std::collections::{BTreeMap, BTreeSet};

use netcfg_common::{NetCfgResult, ReconciliationMode};

use crate::tables::Attribute;
use crate::types::{AttrValue, ConfigGlobal};

/// What a single attribute needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Assert or change the value.
    Set(AttrValue),
    /// Return the attribute to its device default.
    Remove,
}

/// Changes needed to move the current state toward the desired state.
///
/// An attribute is never in both `to_set` and `to_remove`; a set always
/// wins over a removal of the same attribute. Both collections are ordered
/// by [`Attribute`], i.e. in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    to_set: BTreeMap<Attribute, AttrValue>,
    to_remove: BTreeSet<Attribute>,
}

impl Delta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an assertion, displacing any pending removal.
    pub fn set(&mut self, attribute: Attribute, value: AttrValue) {
        self.to_remove.remove(&attribute);
        self.to_set.insert(attribute, value);
    }

    /// Records a removal unless the attribute is already being set.
    ///
    /// Returns false when the removal lost the tie-break.
    pub fn remove(&mut self, attribute: Attribute) -> bool {
        if self.to_set.contains_key(&attribute) {
            return false;
        }
        self.to_remove.insert(attribute);
        true
    }

    pub fn to_set(&self) -> &BTreeMap<Attribute, AttrValue> {
        &self.to_set
    }

    pub fn to_remove(&self) -> &BTreeSet<Attribute> {
        &self.to_remove
    }

    pub fn is_empty(&self) -> bool {
        self.to_set.is_empty() && self.to_remove.is_empty()
    }

    /// Number of attributes touched.
    pub fn len(&self) -> usize {
        self.to_set.len() + self.to_remove.len()
    }

    /// The change for `attribute`, if any.
    pub fn change(&self, attribute: Attribute) -> Option<Change> {
        if let Some(value) = self.to_set.get(&attribute) {
            Some(Change::Set(*value))
        } else if self.to_remove.contains(&attribute) {
            Some(Change::Remove)
        } else {
            None
        }
    }

    /// All changes in canonical order, one per attribute.
    pub fn changes(&self) -> impl Iterator<Item = (Attribute, Change)> + '_ {
        Attribute::all().filter_map(move |attr| self.change(attr).map(|c| (attr, c)))
    }

    /// Projects `base` forward assuming every change lands.
    ///
    /// Removed attributes become absent, since device defaults are not shown
    /// in the running configuration.
    pub fn apply_to(&self, base: &ConfigGlobal) -> NetCfgResult<ConfigGlobal> {
        let mut projected = base.clone();
        for (attr, change) in self.changes() {
            match change {
                Change::Set(value) => projected.set(attr, Some(value))?,
                Change::Remove => projected.set(attr, None)?,
            }
        }
        Ok(projected)
    }
}

/// Computes the delta for `mode`.
///
/// - `Merged`: attributes present in `desired` that differ from `current`
///   are set; nothing is ever removed.
/// - `Replaced`: as merged, and attributes present only in `current` are
///   removed.
/// - `Deleted`: `desired` is ignored and every attribute present in
///   `current` is removed.
pub fn diff(desired: &ConfigGlobal, current: &ConfigGlobal, mode: ReconciliationMode) -> Delta {
    let mut delta = Delta::new();

    for attr in Attribute::all() {
        let want = desired.get(attr);
        let have = current.get(attr);

        match mode {
            ReconciliationMode::Merged => {
                if let Some(value) = want {
                    if want != have {
                        delta.set(attr, value);
                    }
                }
            }
            ReconciliationMode::Replaced => match (want, have) {
                (Some(value), _) if want != have => delta.set(attr, value),
                (None, Some(_)) => {
                    delta.remove(attr);
                }
                _ => {}
            },
            ReconciliationMode::Deleted => {
                if have.is_some() {
                    delta.remove(attr);
                }
            }
        }
    }

    delta
}
