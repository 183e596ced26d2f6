//! Attribute schema for global LLDP configuration.
//!
//! [`SCHEMA`] is the single table that drives the differ, the command
//! generator and the running-config parser. Its row order is the canonical
//! order in which attributes are compared and commands are emitted.

use netcfg_common::Command;

use crate::types::AttrValue;

/// Show command whose output the fact collector parses.
pub const SHOW_LLDP_RUNNING_CONFIG: &str = "show running-config | section lldp";

/// Leading keyword of every managed command.
pub const LLDP_KEYWORD: &str = "lldp";

/// Keyword introducing a TLV toggle.
pub const TLV_SELECT_KEYWORD: &str = "tlv-select";

/// Optional TLVs advertised in LLDP frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tlv {
    LinkAggregation,
    ManagementAddress,
    MaxFrameSize,
    PortDescription,
    SystemCapabilities,
    SystemDescription,
    SystemName,
}

impl Tlv {
    /// All TLVs in declaration order.
    pub const ALL: [Tlv; 7] = [
        Tlv::LinkAggregation,
        Tlv::ManagementAddress,
        Tlv::MaxFrameSize,
        Tlv::PortDescription,
        Tlv::SystemCapabilities,
        Tlv::SystemDescription,
        Tlv::SystemName,
    ];

    /// Field name in the structured model (`tlv_select.<name>`).
    pub fn field_name(self) -> &'static str {
        match self {
            Tlv::LinkAggregation => "link_aggregation",
            Tlv::ManagementAddress => "management_address",
            Tlv::MaxFrameSize => "max_frame_size",
            Tlv::PortDescription => "port_description",
            Tlv::SystemCapabilities => "system_capabilities",
            Tlv::SystemDescription => "system_description",
            Tlv::SystemName => "system_name",
        }
    }

    /// CLI keyword following `lldp tlv-select`.
    pub fn keyword(self) -> &'static str {
        match self {
            Tlv::LinkAggregation => "link-aggregation",
            Tlv::ManagementAddress => "management-address",
            Tlv::MaxFrameSize => "max-frame-size",
            Tlv::PortDescription => "port-description",
            Tlv::SystemCapabilities => "system-capabilities",
            Tlv::SystemDescription => "system-description",
            Tlv::SystemName => "system-name",
        }
    }

    /// Looks up a TLV by its CLI keyword.
    pub fn from_keyword(keyword: &str) -> Option<Tlv> {
        Tlv::ALL.into_iter().find(|t| t.keyword() == keyword)
    }
}

/// A managed configuration leaf.
///
/// The derived ordering follows declaration order, which is the canonical
/// order: scalars first, then TLV toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Holdtime,
    Reinit,
    Timer,
    Tlv(Tlv),
}

/// Value type of an attribute, which selects its command templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Integer seconds: `lldp <kw> <n>` / `no lldp <kw>`.
    Scalar,
    /// Boolean toggle: `lldp <kw>` / `no lldp <kw>` / `default lldp <kw>`.
    Toggle,
}

/// One row of the attribute schema.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    /// Dotted path in the structured model.
    pub path: &'static str,
    pub kind: AttrKind,
    /// Command text without value or prefix, e.g. `lldp holdtime`.
    pub cli: &'static str,
}

macro_rules! tlv_row {
    ($tlv:ident, $path:literal, $cli:literal) => {
        AttributeSpec {
            attribute: Attribute::Tlv(Tlv::$tlv),
            path: $path,
            kind: AttrKind::Toggle,
            cli: $cli,
        }
    };
}

/// The attribute schema in canonical order.
pub const SCHEMA: [AttributeSpec; 10] = [
    AttributeSpec {
        attribute: Attribute::Holdtime,
        path: "holdtime",
        kind: AttrKind::Scalar,
        cli: "lldp holdtime",
    },
    AttributeSpec {
        attribute: Attribute::Reinit,
        path: "reinit",
        kind: AttrKind::Scalar,
        cli: "lldp reinit",
    },
    AttributeSpec {
        attribute: Attribute::Timer,
        path: "timer",
        kind: AttrKind::Scalar,
        cli: "lldp timer",
    },
    tlv_row!(LinkAggregation, "tlv_select.link_aggregation", "lldp tlv-select link-aggregation"),
    tlv_row!(ManagementAddress, "tlv_select.management_address", "lldp tlv-select management-address"),
    tlv_row!(MaxFrameSize, "tlv_select.max_frame_size", "lldp tlv-select max-frame-size"),
    tlv_row!(PortDescription, "tlv_select.port_description", "lldp tlv-select port-description"),
    tlv_row!(SystemCapabilities, "tlv_select.system_capabilities", "lldp tlv-select system-capabilities"),
    tlv_row!(SystemDescription, "tlv_select.system_description", "lldp tlv-select system-description"),
    tlv_row!(SystemName, "tlv_select.system_name", "lldp tlv-select system-name"),
];

impl Attribute {
    /// Iterates attributes in canonical order.
    pub fn all() -> impl Iterator<Item = Attribute> {
        SCHEMA.iter().map(|row| row.attribute)
    }

    /// Returns the schema row for this attribute.
    pub fn spec(self) -> &'static AttributeSpec {
        let idx = match self {
            Attribute::Holdtime => 0,
            Attribute::Reinit => 1,
            Attribute::Timer => 2,
            Attribute::Tlv(tlv) => 3 + tlv as usize,
        };
        &SCHEMA[idx]
    }

    /// Dotted model path, e.g. `tlv_select.system_name`.
    pub fn path(self) -> &'static str {
        self.spec().path
    }

    pub fn kind(self) -> AttrKind {
        self.spec().kind
    }

    /// Resolves a dotted model path.
    pub fn from_path(path: &str) -> Option<Attribute> {
        SCHEMA.iter().find(|row| row.path == path).map(|row| row.attribute)
    }

    /// Resolves a scalar keyword (`holdtime`, `reinit`, `timer`).
    pub fn scalar_from_keyword(keyword: &str) -> Option<Attribute> {
        match keyword {
            "holdtime" => Some(Attribute::Holdtime),
            "reinit" => Some(Attribute::Reinit),
            "timer" => Some(Attribute::Timer),
            _ => None,
        }
    }
}

impl AttributeSpec {
    /// Command asserting `value`.
    ///
    /// For toggles `false` is the disable form, which the device shows as
    /// `no lldp tlv-select <kw>` in its running configuration.
    pub fn set_command(&self, value: AttrValue) -> Command {
        match (self.kind, value) {
            (AttrKind::Toggle, AttrValue::Bool(true)) => Command::assert(self.cli),
            (AttrKind::Toggle, AttrValue::Bool(false)) => Command::negate(self.cli),
            (_, value) => Command::assert(format!("{} {}", self.cli, value)),
        }
    }

    /// Command returning the attribute to its device default.
    pub fn remove_command(&self) -> Command {
        match self.kind {
            AttrKind::Scalar => Command::negate(self.cli),
            AttrKind::Toggle => Command::restore_default(self.cli),
        }
    }
}
