//! lldp-globald - Global LLDP Configuration Manager
//!
//! Entry point: loads a task file, reconciles the local device through its
//! CLI and prints the report as JSON on stdout.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lldp_globald::{AfterState, LldpFactCollector, LldpGlobalMgr, ReconcileOptions, TaskSpec};
use netcfg_common::{shell::FASTCLI_CMD, ReconciliationMode, ShellCli};

/// Global LLDP configuration manager
#[derive(Parser, Debug)]
#[command(name = "lldp-globald")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Task file (YAML, or JSON when the extension is .json)
    #[arg(short = 't', long)]
    task: PathBuf,

    /// Reconciliation state; overrides the task file
    #[arg(short = 's', long)]
    state: Option<ReconciliationMode>,

    /// Report the commands without applying them
    #[arg(long)]
    check: bool,

    /// How to obtain the after state (refetch, project)
    #[arg(long, default_value = "refetch")]
    after: AfterState,

    /// Device CLI binary
    #[arg(long, default_value = FASTCLI_CMD)]
    cli_path: String,

    /// CLI privilege level
    #[arg(long, default_value = "15")]
    privilege: u8,

    /// Per-invocation CLI timeout in seconds (0 disables)
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging subsystem
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let mut task = TaskSpec::load(&args.task)
        .with_context(|| format!("loading task {}", args.task.display()))?;
    if let Some(state) = args.state {
        task.state = state;
    }
    task.validate().context("validating task")?;

    let mut cli = ShellCli::new()
        .with_cli_path(&args.cli_path)
        .with_privilege(args.privilege);
    if args.timeout_secs > 0 {
        cli = cli.with_timeout(Duration::from_secs(args.timeout_secs));
    }
    let collector = LldpFactCollector::new(cli.clone());

    let mgr = LldpGlobalMgr::with_options(ReconcileOptions {
        check_mode: args.check,
        after_state: args.after,
    });
    let report = mgr
        .reconcile(&task.desired(), task.state, &collector, &cli)
        .await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!(outcome = %report.outcome, changed = report.changed, "Reconciliation finished");
    Ok(!report.is_failed())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting lldp-globald ---");

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("lldp-globald failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
