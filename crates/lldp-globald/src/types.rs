//! Type definitions for global LLDP configuration.
//!
//! Every field is optional. `None` means "not managed by this
//! configuration", which is different from an explicit disabled value.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use netcfg_common::{NetCfgError, NetCfgResult};

use crate::tables::{AttrKind, Attribute, Tlv};

/// A leaf value in the configuration model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// Seconds for `holdtime`, `reinit` and `timer`.
    Int(u32),
    /// TLV enable/disable.
    Bool(bool),
}

impl AttrValue {
    pub fn as_int(self) -> Option<u32> {
        match self {
            AttrValue::Int(v) => Some(v),
            AttrValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(v),
            AttrValue::Int(_) => None,
        }
    }

    fn is_kind(self, kind: AttrKind) -> bool {
        matches!(
            (self, kind),
            (AttrValue::Int(_), AttrKind::Scalar) | (AttrValue::Bool(_), AttrKind::Toggle)
        )
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// TLV selection toggles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlvSelect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_aggregation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_address: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_frame_size: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_description: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_capabilities: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_description: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_name: Option<bool>,
}

impl TlvSelect {
    fn slot(&mut self, tlv: Tlv) -> &mut Option<bool> {
        match tlv {
            Tlv::LinkAggregation => &mut self.link_aggregation,
            Tlv::ManagementAddress => &mut self.management_address,
            Tlv::MaxFrameSize => &mut self.max_frame_size,
            Tlv::PortDescription => &mut self.port_description,
            Tlv::SystemCapabilities => &mut self.system_capabilities,
            Tlv::SystemDescription => &mut self.system_description,
            Tlv::SystemName => &mut self.system_name,
        }
    }

    pub fn get(&self, tlv: Tlv) -> Option<bool> {
        match tlv {
            Tlv::LinkAggregation => self.link_aggregation,
            Tlv::ManagementAddress => self.management_address,
            Tlv::MaxFrameSize => self.max_frame_size,
            Tlv::PortDescription => self.port_description,
            Tlv::SystemCapabilities => self.system_capabilities,
            Tlv::SystemDescription => self.system_description,
            Tlv::SystemName => self.system_name,
        }
    }

    pub fn set(&mut self, tlv: Tlv, value: Option<bool>) {
        *self.slot(tlv) = value;
    }

    /// True iff no TLV is managed.
    pub fn is_empty(&self) -> bool {
        Tlv::ALL.iter().all(|t| self.get(*t).is_none())
    }
}

/// Global LLDP configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigGlobal {
    /// Holdtime (seconds) advertised in LLDP frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdtime: Option<u32>,

    /// Delay (seconds) before LLDP initialization on an interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinit: Option<u32>,

    /// Transmit interval (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,

    /// An explicit `null` reads as "no TLV managed".
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "TlvSelect::is_empty"
    )]
    pub tlv_select: TlvSelect,
}

impl ConfigGlobal {
    /// Creates an empty configuration (nothing managed).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holdtime(mut self, seconds: u32) -> Self {
        self.holdtime = Some(seconds);
        self
    }

    pub fn reinit(mut self, seconds: u32) -> Self {
        self.reinit = Some(seconds);
        self
    }

    pub fn timer(mut self, seconds: u32) -> Self {
        self.timer = Some(seconds);
        self
    }

    /// Manages `tlv` with the given enable state.
    pub fn tlv(mut self, tlv: Tlv, enabled: bool) -> Self {
        self.tlv_select.set(tlv, Some(enabled));
        self
    }

    /// True iff every field, recursively, is absent.
    pub fn is_empty(&self) -> bool {
        self.holdtime.is_none()
            && self.reinit.is_none()
            && self.timer.is_none()
            && self.tlv_select.is_empty()
    }

    /// Reads a leaf by attribute.
    pub fn get(&self, attribute: Attribute) -> Option<AttrValue> {
        match attribute {
            Attribute::Holdtime => self.holdtime.map(AttrValue::Int),
            Attribute::Reinit => self.reinit.map(AttrValue::Int),
            Attribute::Timer => self.timer.map(AttrValue::Int),
            Attribute::Tlv(tlv) => self.tlv_select.get(tlv).map(AttrValue::Bool),
        }
    }

    /// Writes a leaf by attribute. `None` un-manages it.
    ///
    /// Fails only when the value kind does not match the attribute kind.
    pub fn set(&mut self, attribute: Attribute, value: Option<AttrValue>) -> NetCfgResult<()> {
        if let Some(v) = value {
            if !v.is_kind(attribute.kind()) {
                return Err(kind_mismatch(attribute, v));
            }
        }
        match attribute {
            Attribute::Holdtime => self.holdtime = value.and_then(AttrValue::as_int),
            Attribute::Reinit => self.reinit = value.and_then(AttrValue::as_int),
            Attribute::Timer => self.timer = value.and_then(AttrValue::as_int),
            Attribute::Tlv(tlv) => self.tlv_select.set(tlv, value.and_then(AttrValue::as_bool)),
        }
        Ok(())
    }

    /// Reads a leaf by dotted path, e.g. `tlv_select.system_name`.
    pub fn get_path(&self, path: &str) -> Option<AttrValue> {
        Attribute::from_path(path).and_then(|attr| self.get(attr))
    }

    /// Writes a leaf by dotted path.
    pub fn set_path(&mut self, path: &str, value: Option<AttrValue>) -> NetCfgResult<()> {
        let attr = Attribute::from_path(path)
            .ok_or_else(|| NetCfgError::invalid_config(path, "not a managed attribute path"))?;
        self.set(attr, value)
    }

    /// Present attributes with their values, in canonical order.
    pub fn entries(&self) -> impl Iterator<Item = (Attribute, AttrValue)> + '_ {
        Attribute::all().filter_map(move |attr| self.get(attr).map(|v| (attr, v)))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn kind_mismatch(attribute: Attribute, value: AttrValue) -> NetCfgError {
    let expected = match attribute.kind() {
        AttrKind::Scalar => "an integer",
        AttrKind::Toggle => "a boolean",
    };
    NetCfgError::invalid_config(
        attribute.path(),
        format!("expected {}, got {}", expected, value),
    )
}
