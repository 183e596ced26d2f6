//! LldpGlobalMgr - reconciliation engine for global LLDP configuration

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error, info, instrument, warn};

use netcfg_common::{
    command_strings, Command, CommandSink, FactCollector, NetCfgError, NetCfgResult,
    ReconciliationMode,
};

use crate::diff::{diff, Delta};
use crate::facts::render_running_config;
use crate::generator::generate;
use crate::types::ConfigGlobal;

/// How the `after` state is obtained once commands were applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfterState {
    /// Fetch the running configuration again.
    #[default]
    Refetch,
    /// Apply the delta to `before` in memory.
    Project,
}

impl FromStr for AfterState {
    type Err = NetCfgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refetch" => Ok(AfterState::Refetch),
            "project" => Ok(AfterState::Project),
            other => Err(NetCfgError::invalid_config(
                "after",
                format!("'{}' is not one of refetch, project", other),
            )),
        }
    }
}

/// Engine options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Compute and report commands without applying them.
    pub check_mode: bool,
    pub after_state: AfterState,
}

/// Terminal state of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Device already converged; nothing was sent.
    NoOp,
    /// Check mode: commands computed but not sent.
    Planned,
    /// Commands were sent and accepted.
    Applied,
    /// The sink rejected the commands.
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::NoOp => "no_op",
            Outcome::Planned => "planned",
            Outcome::Applied => "applied",
            Outcome::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub before: ConfigGlobal,
    /// Equal to `before` unless commands were accepted (or planned).
    pub after: ConfigGlobal,
    /// Commands sent, or attempted when the outcome is `Failed`.
    pub commands: Vec<Command>,
    pub changed: bool,
    pub outcome: Outcome,
    /// Sink error text for `Failed`. For `Applied`, set when re-reading the
    /// device failed and `after` is the projection instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReconcileReport {
    fn unchanged(before: ConfigGlobal, commands: Vec<Command>, outcome: Outcome) -> Self {
        Self {
            after: before.clone(),
            changed: !commands.is_empty(),
            before,
            commands,
            outcome,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// LldpGlobalMgr converges global LLDP settings to a desired state.
///
/// Flow per call:
/// 1. Fetch current state through the fact collector
/// 2. Diff desired against current under the requested mode
/// 3. Generate the ordered command list
/// 4. Apply through the sink (skipped when empty or in check mode)
/// 5. Derive the `after` state
///
/// Steps run strictly in sequence. The engine holds no per-device lock;
/// callers must not run two reconciliations against one device at once.
#[derive(Debug, Clone, Default)]
pub struct LldpGlobalMgr {
    options: ReconcileOptions,
}

impl LldpGlobalMgr {
    /// Creates a new LldpGlobalMgr with default options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReconcileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Computes the delta and commands without touching any device.
    pub fn plan(
        &self,
        desired: &ConfigGlobal,
        current: &ConfigGlobal,
        mode: ReconciliationMode,
    ) -> (Delta, Vec<Command>) {
        let delta = diff(desired, current, mode);
        let commands = generate(&delta);
        (delta, commands)
    }

    /// Runs one reconciliation.
    ///
    /// Fetch failures abort with [`NetCfgError::Fetch`] before anything is
    /// generated. A failed re-fetch after a successful apply still reports
    /// `Applied`, with the projected `after` and the fetch error. Sink failures do not return `Err`: the report comes back
    /// with [`Outcome::Failed`], the attempted commands and `after == before`.
    #[instrument(skip_all, fields(mode = %mode, check_mode = self.options.check_mode))]
    pub async fn reconcile<C, S>(
        &self,
        desired: &ConfigGlobal,
        mode: ReconciliationMode,
        collector: &C,
        sink: &S,
    ) -> NetCfgResult<ReconcileReport>
    where
        C: FactCollector<ConfigGlobal> + ?Sized,
        S: CommandSink + ?Sized,
    {
        let before = collector
            .fetch_current()
            .await
            .map_err(NetCfgError::fetch)?;
        debug!("Before state:\n{}", render_running_config(&before));

        let (delta, commands) = self.plan(desired, &before, mode);

        if commands.is_empty() {
            info!("LLDP global configuration already converged");
            return Ok(ReconcileReport::unchanged(before, commands, Outcome::NoOp));
        }

        info!("{} command(s) needed for {} state", commands.len(), mode);
        for command in &commands {
            debug!("  {}", command);
        }

        if self.options.check_mode {
            let after = delta.apply_to(&before)?;
            let mut report = ReconcileReport::unchanged(before, commands, Outcome::Planned);
            report.after = after;
            return Ok(report);
        }

        if let Err(e) = sink.apply_commands(&command_strings(&commands)).await {
            let err = NetCfgError::apply(commands.len(), e);
            error!("Failed to apply LLDP global configuration: {}", err);
            let mut report = ReconcileReport::unchanged(before, commands, Outcome::Failed);
            report.error = Some(err.to_string());
            return Ok(report);
        }

        let projected = delta.apply_to(&before)?;
        let mut refetch_error = None;
        let after = match self.options.after_state {
            AfterState::Project => projected,
            // The commands already landed; a failed read must not hide that.
            AfterState::Refetch => match collector.fetch_current().await {
                Ok(after) => {
                    if after != projected {
                        warn!(
                            "Device state after apply differs from projection:\n{}",
                            render_running_config(&after)
                        );
                    }
                    after
                }
                Err(e) => {
                    let err = NetCfgError::fetch(e);
                    warn!("Using projected after state: {}", err);
                    refetch_error = Some(err.to_string());
                    projected
                }
            },
        };

        info!("Applied {} command(s)", commands.len());
        let mut report = ReconcileReport::unchanged(before, commands, Outcome::Applied);
        report.after = after;
        report.error = refetch_error;
        Ok(report)
    }
}
