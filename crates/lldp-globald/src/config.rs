//! Task file loading and validation.
//!
//! A task names the desired configuration and the reconciliation state:
//!
//! ```yaml
//! config:
//!   holdtime: 100
//!   tlv_select:
//!     management_address: false
//!     system_description: true
//! state: merged
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use netcfg_common::{NetCfgError, NetCfgResult, ReconciliationMode};

use crate::types::ConfigGlobal;

/// A validated-on-demand reconciliation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    #[serde(default)]
    pub config: Option<ConfigGlobal>,
    #[serde(default)]
    pub state: ReconciliationMode,
}

impl TaskSpec {
    pub fn new(config: Option<ConfigGlobal>, state: ReconciliationMode) -> Self {
        Self { config, state }
    }

    pub fn from_yaml_str(text: &str) -> NetCfgResult<Self> {
        serde_yaml::from_str(text).map_err(|e| NetCfgError::invalid_config("task", e.to_string()))
    }

    pub fn from_json_str(text: &str) -> NetCfgResult<Self> {
        serde_json::from_str(text).map_err(|e| NetCfgError::invalid_config("task", e.to_string()))
    }

    /// Loads a task file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> NetCfgResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            NetCfgError::internal(format!("Failed to read task file {}: {}", path.display(), e))
        })?;

        let task = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            _ => Self::from_yaml_str(&text)?,
        };
        info!("Loaded task file {} (state: {})", path.display(), task.state);
        Ok(task)
    }

    /// Checks the desired state against domain constraints.
    pub fn validate(&self) -> NetCfgResult<()> {
        let config = match (&self.config, self.state) {
            (Some(config), _) if !config.is_empty() => config,
            (_, ReconciliationMode::Deleted) => return Ok(()),
            _ => {
                return Err(NetCfgError::invalid_config(
                    "config",
                    format!("value of config parameter must not be empty for state {}", self.state),
                ))
            }
        };

        if self.state == ReconciliationMode::Deleted {
            warn!("config is ignored for state deleted");
            return Ok(());
        }

        for (field, value) in [
            ("holdtime", config.holdtime),
            ("reinit", config.reinit),
            ("timer", config.timer),
        ] {
            if value == Some(0) {
                return Err(NetCfgError::invalid_config(field, "must be greater than 0"));
            }
        }
        Ok(())
    }

    /// The desired state handed to the engine; empty when none was given.
    pub fn desired(&self) -> ConfigGlobal {
        self.config.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Tlv;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_yaml_task() {
        let task = TaskSpec::from_yaml_str(
            "config:\n  holdtime: 100\n  tlv_select:\n    system_description: true\nstate: replaced\n",
        )
        .unwrap();
        assert_eq!(task.state, ReconciliationMode::Replaced);
        assert_eq!(
            task.desired(),
            ConfigGlobal::new().holdtime(100).tlv(Tlv::SystemDescription, true)
        );
        task.validate().unwrap();
    }

    #[test]
    fn test_yaml_empty_tlv_select() {
        let task = TaskSpec::from_yaml_str("config:\n  timer: 30\n  tlv_select:\nstate: merged\n")
            .unwrap();
        assert_eq!(task.desired(), ConfigGlobal::new().timer(30));
        task.validate().unwrap();
    }

    #[test]
    fn test_state_defaults_to_merged() {
        let task = TaskSpec::from_json_str(r#"{"config": {"timer": 30}}"#).unwrap();
        assert_eq!(task.state, ReconciliationMode::Merged);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(TaskSpec::from_yaml_str("config: {}\nstate: merged\nforce: true\n").is_err());
        assert!(TaskSpec::from_yaml_str("state: overridden\n").is_err());
        assert!(TaskSpec::from_yaml_str("config:\n  holdtime: -1\n").is_err());
    }

    #[test]
    fn test_validate_requires_config() {
        let task = TaskSpec::new(None, ReconciliationMode::Merged);
        assert!(task.validate().is_err());
        let task = TaskSpec::new(Some(ConfigGlobal::new()), ReconciliationMode::Replaced);
        assert!(task.validate().is_err());
        let task = TaskSpec::new(None, ReconciliationMode::Deleted);
        task.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_zero() {
        let task = TaskSpec::new(Some(ConfigGlobal::new().holdtime(0)), ReconciliationMode::Merged);
        let err = task.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration for holdtime: must be greater than 0"
        );
    }

    #[test]
    fn test_load_by_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"state": "deleted"}}"#).unwrap();
        let task = TaskSpec::load(json.path()).unwrap();
        assert_eq!(task.state, ReconciliationMode::Deleted);

        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "config:\n  reinit: 5").unwrap();
        let task = TaskSpec::load(yaml.path()).unwrap();
        assert_eq!(task.desired(), ConfigGlobal::new().reinit(5));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(TaskSpec::load(Path::new("/nonexistent/task.yml")).is_err());
    }
}
