//! Test fixtures for reconciliation testing
//!
//! Provides an in-memory device and reusable LLDP scenarios

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use lldp_globald::facts::{apply_line, render_running_config};
use lldp_globald::ConfigGlobal;
use netcfg_common::{
    CommandSink, NetCfgError, NetCfgResult, ReconciliationMode, RunningConfigSource,
};

/// Unmanaged lines the mock prints around the managed ones
const UNMANAGED_PREFIX: &str = "lldp run";
const UNMANAGED_SUFFIX: &str = "interface Ethernet1\n   no lldp transmit";

#[derive(Debug, Default)]
struct DeviceState {
    config: ConfigGlobal,
    batches: Vec<Vec<String>>,
    show_count: usize,
    reject_command: Option<String>,
    fail_show: bool,
    fail_show_after: Option<usize>,
}

/// In-memory device speaking the LLDP CLI
///
/// Reads render the stored model as running-config text; writes replay each
/// command through the same line grammar. Commands are applied one by one,
/// so a rejected command leaves earlier ones in place.
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    inner: Arc<Mutex<DeviceState>>,
}

impl MockDevice {
    /// Create a device whose running configuration is `config`
    pub fn new(config: ConfigGlobal) -> Self {
        let device = Self::default();
        device.lock().config = config;
        device
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make the device reject `command` (and everything after it in a batch)
    pub fn reject_command(&self, command: impl Into<String>) {
        self.lock().reject_command = Some(command.into());
    }

    /// Accept every well-formed command again
    pub fn clear_rejection(&self) {
        self.lock().reject_command = None;
    }

    /// Make every show command fail
    pub fn fail_show(&self, fail: bool) {
        self.lock().fail_show = fail;
    }

    /// Serve the first `reads` show commands, then fail every later one
    pub fn fail_show_after(&self, reads: usize) {
        self.lock().fail_show_after = Some(reads);
    }

    /// Current managed configuration
    pub fn config(&self) -> ConfigGlobal {
        self.lock().config.clone()
    }

    /// Text returned for `show running-config | section lldp`
    pub fn running_config(&self) -> String {
        let config = render_running_config(&self.lock().config);
        if config.is_empty() {
            format!("{}\n{}", UNMANAGED_PREFIX, UNMANAGED_SUFFIX)
        } else {
            format!("{}\n{}\n{}", UNMANAGED_PREFIX, config, UNMANAGED_SUFFIX)
        }
    }

    /// Every command received, in order, across all batches
    pub fn captured_commands(&self) -> Vec<String> {
        self.lock().batches.iter().flatten().cloned().collect()
    }

    /// Number of write batches received
    pub fn batch_count(&self) -> usize {
        self.lock().batches.len()
    }

    /// Number of show commands served
    pub fn show_count(&self) -> usize {
        self.lock().show_count
    }

    /// Forget captured commands and counters
    pub fn clear_log(&self) {
        let mut state = self.lock();
        state.batches.clear();
        state.show_count = 0;
    }
}

#[async_trait]
impl RunningConfigSource for MockDevice {
    async fn show(&self, show_command: &str) -> NetCfgResult<String> {
        {
            let mut state = self.lock();
            state.show_count += 1;
            let exhausted = state
                .fail_show_after
                .map_or(false, |reads| state.show_count > reads);
            if state.fail_show || exhausted {
                return Err(NetCfgError::Timeout {
                    command: show_command.to_string(),
                    after_ms: 30_000,
                });
            }
        }
        Ok(self.running_config())
    }
}

#[async_trait]
impl CommandSink for MockDevice {
    async fn apply_commands(&self, commands: &[String]) -> NetCfgResult<()> {
        let mut state = self.lock();
        state.batches.push(commands.to_vec());

        for command in commands {
            let rejected = state.reject_command.as_deref() == Some(command.as_str());
            if rejected || !apply_line(&mut state.config, command)? {
                return Err(NetCfgError::ShellCommandFailed {
                    command: command.clone(),
                    exit_code: 1,
                    output: "% Invalid input".to_string(),
                });
            }
            debug!("mock device applied: {}", command);
        }
        Ok(())
    }
}

/// A single reconciliation expectation
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Device configuration before the run
    pub before: ConfigGlobal,
    /// Desired configuration
    pub desired: ConfigGlobal,
    /// Reconciliation mode
    pub mode: ReconciliationMode,
    /// Expected commands, in order
    pub expected_commands: Vec<String>,
    /// Expected device configuration after the run
    pub expected_after: ConfigGlobal,
}

impl Scenario {
    /// Create a new scenario; expectations default to "nothing changes"
    pub fn new(name: impl Into<String>, before: ConfigGlobal, mode: ReconciliationMode) -> Self {
        Self {
            name: name.into(),
            expected_after: before.clone(),
            before,
            desired: ConfigGlobal::new(),
            mode,
            expected_commands: Vec::new(),
        }
    }

    pub fn desired(mut self, desired: ConfigGlobal) -> Self {
        self.desired = desired;
        self
    }

    /// Add an expected command
    pub fn expect_command(mut self, command: impl Into<String>) -> Self {
        self.expected_commands.push(command.into());
        self
    }

    pub fn expect_after(mut self, after: ConfigGlobal) -> Self {
        self.expected_after = after;
        self
    }
}

/// LLDP configurations used across tests
pub mod lldp_fixtures {
    use super::*;
    use lldp_globald::Tlv;

    /// Running configuration from the module documentation
    pub fn documented_before() -> ConfigGlobal {
        ConfigGlobal::new()
            .timer(3000)
            .holdtime(100)
            .reinit(5)
            .tlv(Tlv::ManagementAddress, false)
            .tlv(Tlv::SystemDescription, false)
    }

    /// Desired configuration from the module documentation
    pub fn documented_desired() -> ConfigGlobal {
        ConfigGlobal::new()
            .holdtime(100)
            .tlv(Tlv::ManagementAddress, false)
            .tlv(Tlv::PortDescription, false)
            .tlv(Tlv::SystemDescription, true)
    }

    /// Every TLV explicitly enabled and all timers set
    pub fn fully_managed() -> ConfigGlobal {
        Tlv::ALL
            .into_iter()
            .fold(ConfigGlobal::new().holdtime(120).reinit(2).timer(30), |cfg, tlv| {
                cfg.tlv(tlv, true)
            })
    }

    /// A spread of configurations for pairwise property checks
    pub fn samples() -> Vec<ConfigGlobal> {
        vec![
            ConfigGlobal::new(),
            documented_before(),
            documented_desired(),
            fully_managed(),
            ConfigGlobal::new().timer(5),
            ConfigGlobal::new()
                .holdtime(100)
                .tlv(Tlv::SystemName, false)
                .tlv(Tlv::LinkAggregation, true),
            ConfigGlobal::new()
                .reinit(5)
                .tlv(Tlv::ManagementAddress, true)
                .tlv(Tlv::SystemDescription, false),
        ]
    }

    /// Merged scenario from the module documentation
    pub fn documented_merged() -> Scenario {
        Scenario::new("merged", documented_before(), ReconciliationMode::Merged)
            .desired(documented_desired())
            .expect_command("no lldp tlv-select port-description")
            .expect_command("lldp tlv-select system-description")
            .expect_after(
                documented_before()
                    .tlv(Tlv::PortDescription, false)
                    .tlv(Tlv::SystemDescription, true),
            )
    }

    /// Replaced scenario from the module documentation
    pub fn documented_replaced() -> Scenario {
        Scenario::new("replaced", documented_before(), ReconciliationMode::Replaced)
            .desired(documented_desired())
            .expect_command("no lldp reinit")
            .expect_command("no lldp timer")
            .expect_command("no lldp tlv-select port-description")
            .expect_command("lldp tlv-select system-description")
            .expect_after(documented_desired())
    }

    /// Deleted scenario from the module documentation
    pub fn documented_deleted() -> Scenario {
        Scenario::new("deleted", documented_before(), ReconciliationMode::Deleted)
            .desired(documented_desired())
            .expect_command("no lldp holdtime")
            .expect_command("no lldp reinit")
            .expect_command("no lldp timer")
            .expect_command("default lldp tlv-select management-address")
            .expect_command("default lldp tlv-select system-description")
            .expect_after(ConfigGlobal::new())
    }
}
