//! Fact collection from the device running configuration.
//!
//! The device prints global LLDP settings as top-level lines of
//! `show running-config | section lldp`:
//!
//! ```text
//! lldp timer 3000
//! lldp holdtime 100
//! lldp reinit 5
//! no lldp tlv-select management-address
//! no lldp tlv-select system-description
//! interface Ethernet1
//!    no lldp transmit
//! ```
//!
//! Indented interface sub-commands and unmanaged `lldp` keywords are
//! skipped. The same line grammar also understands configuration
//! commands (`no ...`, `default ...`), so anything that must replay
//! commands against a model can reuse [`parse_line`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use netcfg_common::{FactCollector, NetCfgError, NetCfgResult, RunningConfigSource};

use crate::tables::{
    Attribute, Tlv, LLDP_KEYWORD, SHOW_LLDP_RUNNING_CONFIG, TLV_SELECT_KEYWORD,
};
use crate::types::{AttrValue, ConfigGlobal};

/// Top-level `[no|default] lldp <keyword> [<arg>]` lines.
static LLDP_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:(no|default)\s+)?{}\s+(\S+)(?:\s+(\S+))?",
        LLDP_KEYWORD
    ))
    .expect("Invalid regex pattern")
});

/// A line resolved to a managed attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLine {
    pub attribute: Attribute,
    /// `None` when the line returns the attribute to its default.
    pub value: Option<AttrValue>,
}

/// Parses one running-config or command line.
///
/// Returns `Ok(None)` for lines that do not touch a managed attribute.
pub fn parse_line(line: &str) -> NetCfgResult<Option<ConfigLine>> {
    let caps = match LLDP_LINE_RE.captures(line.trim_end()) {
        Some(caps) => caps,
        None => return Ok(None),
    };

    let prefix = caps.get(1).map(|m| m.as_str());
    let keyword = &caps[2];
    let arg = caps.get(3).map(|m| m.as_str());

    if keyword == TLV_SELECT_KEYWORD {
        let tlv = match arg.and_then(Tlv::from_keyword) {
            Some(tlv) => tlv,
            None => {
                debug!("Ignoring unmanaged TLV line: {}", line.trim());
                return Ok(None);
            }
        };
        let value = match prefix {
            None => Some(AttrValue::Bool(true)),
            Some("no") => Some(AttrValue::Bool(false)),
            _ => None,
        };
        return Ok(Some(ConfigLine {
            attribute: Attribute::Tlv(tlv),
            value,
        }));
    }

    let attribute = match Attribute::scalar_from_keyword(keyword) {
        Some(attr) => attr,
        None => {
            debug!("Ignoring unmanaged lldp line: {}", line.trim());
            return Ok(None);
        }
    };

    // `no lldp timer 30` is accepted by the device; the value is irrelevant.
    if prefix.is_some() {
        return Ok(Some(ConfigLine {
            attribute,
            value: None,
        }));
    }

    let raw = arg.ok_or_else(|| NetCfgError::parse(line.trim(), "missing value"))?;
    let seconds: u32 = raw
        .parse()
        .map_err(|_| NetCfgError::parse(line.trim(), format!("'{}' is not an integer", raw)))?;

    Ok(Some(ConfigLine {
        attribute,
        value: Some(AttrValue::Int(seconds)),
    }))
}

/// Builds the model from `show running-config | section lldp` output.
pub fn parse_running_config(text: &str) -> NetCfgResult<ConfigGlobal> {
    let mut config = ConfigGlobal::new();
    for line in text.lines() {
        if let Some(parsed) = parse_line(line)? {
            config.set(parsed.attribute, parsed.value)?;
        }
    }
    Ok(config)
}

/// Renders the model as running-config lines in canonical order.
///
/// Inverse of [`parse_running_config`] for managed attributes.
pub fn render_running_config(config: &ConfigGlobal) -> String {
    config
        .entries()
        .map(|(attr, value)| attr.spec().set_command(value).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replays one configuration command against `config`.
///
/// Returns `Ok(false)` when the command does not touch a managed attribute.
pub fn apply_line(config: &mut ConfigGlobal, line: &str) -> NetCfgResult<bool> {
    match parse_line(line)? {
        Some(parsed) => {
            config.set(parsed.attribute, parsed.value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Adapts a raw running-config source into a typed fact collector.
#[derive(Debug, Clone)]
pub struct LldpFactCollector<S> {
    source: S,
}

impl<S: RunningConfigSource> LldpFactCollector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: RunningConfigSource> FactCollector<ConfigGlobal> for LldpFactCollector<S> {
    #[instrument(skip(self))]
    async fn fetch_current(&self) -> NetCfgResult<ConfigGlobal> {
        let text = self.source.show(SHOW_LLDP_RUNNING_CONFIG).await?;
        let config = parse_running_config(&text)?;
        debug!(?config, "Collected LLDP global facts");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RUNNING: &str = "lldp timer 3000
lldp holdtime 100
lldp reinit 5
no lldp tlv-select management-address
no lldp tlv-select system-description
interface Ethernet1
   no lldp transmit
   lldp tlv-select system-name";

    fn doc_config() -> ConfigGlobal {
        ConfigGlobal::new()
            .timer(3000)
            .holdtime(100)
            .reinit(5)
            .tlv(Tlv::ManagementAddress, false)
            .tlv(Tlv::SystemDescription, false)
    }

    #[test]
    fn test_parse_running_config() {
        assert_eq!(parse_running_config(RUNNING).unwrap(), doc_config());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_running_config("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_ignores_unmanaged_lines() {
        let text = "lldp run\nno lldp run\nlldp management-address Management1\nlldp tlv-select dcbx\nlldp holdtime 30";
        assert_eq!(parse_running_config(text).unwrap(), ConfigGlobal::new().holdtime(30));
    }

    #[test]
    fn test_parse_bad_integer() {
        let err = parse_running_config("lldp timer fast").unwrap_err();
        assert!(matches!(err, NetCfgError::Parse { .. }));
        assert!(parse_line("lldp holdtime").is_err());
    }

    #[test]
    fn test_parse_line_forms() {
        assert_eq!(
            parse_line("no lldp timer").unwrap(),
            Some(ConfigLine {
                attribute: Attribute::Timer,
                value: None
            })
        );
        assert_eq!(
            parse_line("lldp tlv-select port-description").unwrap(),
            Some(ConfigLine {
                attribute: Attribute::Tlv(Tlv::PortDescription),
                value: Some(AttrValue::Bool(true))
            })
        );
        assert_eq!(
            parse_line("default lldp tlv-select port-description").unwrap(),
            Some(ConfigLine {
                attribute: Attribute::Tlv(Tlv::PortDescription),
                value: None
            })
        );
        assert_eq!(parse_line("   lldp holdtime 5").unwrap(), None);
        assert_eq!(parse_line("lldpx holdtime 5").unwrap(), None);
    }

    #[test]
    fn test_render_matches_parse() {
        let cfg = doc_config().tlv(Tlv::SystemName, true);
        let text = render_running_config(&cfg);
        assert_eq!(
            text,
            "lldp holdtime 100\nlldp reinit 5\nlldp timer 3000\n\
             no lldp tlv-select management-address\n\
             no lldp tlv-select system-description\n\
             lldp tlv-select system-name"
        );
        assert_eq!(parse_running_config(&text).unwrap(), cfg);
    }

    #[test]
    fn test_apply_line() {
        let mut cfg = doc_config();
        assert!(apply_line(&mut cfg, "no lldp timer").unwrap());
        assert!(apply_line(&mut cfg, "default lldp tlv-select management-address").unwrap());
        assert!(!apply_line(&mut cfg, "lldp run").unwrap());
        assert_eq!(
            cfg,
            ConfigGlobal::new()
                .holdtime(100)
                .reinit(5)
                .tlv(Tlv::SystemDescription, false)
        );
    }

    struct StaticSource(&'static str);

    #[async_trait]
    impl RunningConfigSource for StaticSource {
        async fn show(&self, show_command: &str) -> NetCfgResult<String> {
            assert_eq!(show_command, SHOW_LLDP_RUNNING_CONFIG);
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_fact_collector() {
        let collector = LldpFactCollector::new(StaticSource(RUNNING));
        assert_eq!(collector.fetch_current().await.unwrap(), doc_config());
    }
}
