//! End-to-end reconciliation against the in-memory device
//!
//! Every run goes through the text path: running-config rendering, parsing,
//! diffing, command generation and command replay.

use lldp_globald::{
    diff, AfterState, Attribute, ConfigGlobal, LldpFactCollector, LldpGlobalMgr, Outcome,
    ReconcileOptions, ReconcileReport,
};
use netcfg_common::{command_strings, NetCfgError, NetCfgResult, ReconciliationMode};
use netcfg_test::{lldp_fixtures, CommandVerifier, MockDevice, Scenario};
use pretty_assertions::assert_eq;

const MODES: [ReconciliationMode; 3] = [
    ReconciliationMode::Merged,
    ReconciliationMode::Replaced,
    ReconciliationMode::Deleted,
];

async fn run(
    mgr: &LldpGlobalMgr,
    device: &MockDevice,
    desired: &ConfigGlobal,
    mode: ReconciliationMode,
) -> NetCfgResult<ReconcileReport> {
    let collector = LldpFactCollector::new(device.clone());
    mgr.reconcile(desired, mode, &collector, device).await
}

async fn check_scenario(scenario: Scenario) {
    let device = MockDevice::new(scenario.before.clone());
    let report = run(&LldpGlobalMgr::new(), &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();

    assert_eq!(report.outcome, Outcome::Applied, "{}", scenario.name);
    assert!(report.changed);
    assert_eq!(report.before, scenario.before);
    assert_eq!(report.after, scenario.expected_after, "{}", scenario.name);
    assert_eq!(device.config(), scenario.expected_after);

    let verifier = CommandVerifier::new(device.captured_commands());
    verifier.assert_sequence(&scenario.expected_commands).unwrap();
    assert_eq!(command_strings(&report.commands), scenario.expected_commands);
    assert_eq!(device.batch_count(), 1);
}

#[tokio::test]
async fn test_documented_merged() {
    check_scenario(lldp_fixtures::documented_merged()).await;
}

#[tokio::test]
async fn test_documented_replaced() {
    check_scenario(lldp_fixtures::documented_replaced()).await;
}

#[tokio::test]
async fn test_documented_deleted() {
    check_scenario(lldp_fixtures::documented_deleted()).await;
    let device = MockDevice::new(lldp_fixtures::documented_before());
    run(
        &LldpGlobalMgr::new(),
        &device,
        &ConfigGlobal::new(),
        ReconciliationMode::Deleted,
    )
    .await
    .unwrap();
    CommandVerifier::new(device.captured_commands())
        .assert_only_removals()
        .unwrap();
}

#[tokio::test]
async fn test_second_run_is_noop_in_every_mode() {
    let mgr = LldpGlobalMgr::new();
    for before in lldp_fixtures::samples() {
        for desired in lldp_fixtures::samples() {
            for mode in MODES {
                let device = MockDevice::new(before.clone());
                run(&mgr, &device, &desired, mode).await.unwrap();
                device.clear_log();

                let report = run(&mgr, &device, &desired, mode).await.unwrap();
                assert_eq!(report.outcome, Outcome::NoOp, "{:?} {:?} {}", before, desired, mode);
                assert!(!report.changed);
                assert!(report.commands.is_empty());
                assert_eq!(report.before, report.after);
                assert_eq!(device.batch_count(), 0);
            }
        }
    }
}

#[tokio::test]
async fn test_merged_never_removes_unmentioned() {
    let mgr = LldpGlobalMgr::new();
    for before in lldp_fixtures::samples() {
        for desired in lldp_fixtures::samples() {
            let device = MockDevice::new(before.clone());
            let report = run(&mgr, &device, &desired, ReconciliationMode::Merged)
                .await
                .unwrap();

            for attribute in Attribute::all() {
                let expected = desired.get(attribute).or_else(|| before.get(attribute));
                assert_eq!(report.after.get(attribute), expected, "{:?}", attribute);
            }
            CommandVerifier::new(device.captured_commands())
                .assert_command_not_executed("default ")
                .unwrap();
        }
    }
}

#[tokio::test]
async fn test_replaced_converges_to_desired() {
    let mgr = LldpGlobalMgr::new();
    for before in lldp_fixtures::samples() {
        for desired in lldp_fixtures::samples() {
            let device = MockDevice::new(before.clone());
            let report = run(&mgr, &device, &desired, ReconciliationMode::Replaced)
                .await
                .unwrap();
            assert_eq!(report.after, desired);
            assert_eq!(device.config(), desired);
        }
    }
}

#[tokio::test]
async fn test_deleted_clears_everything() {
    let mgr = LldpGlobalMgr::new();
    for before in lldp_fixtures::samples() {
        let device = MockDevice::new(before.clone());
        let report = run(
            &mgr,
            &device,
            &lldp_fixtures::fully_managed(),
            ReconciliationMode::Deleted,
        )
        .await
        .unwrap();
        assert!(report.after.is_empty());
        assert_eq!(report.changed, !before.is_empty());
        assert!(device.running_config().lines().all(|l| !l.starts_with("lldp tlv-select")));
    }
}

#[test]
fn test_delta_is_mutually_exclusive_and_deterministic() {
    let mgr = LldpGlobalMgr::new();
    for before in lldp_fixtures::samples() {
        for desired in lldp_fixtures::samples() {
            for mode in MODES {
                let delta = diff(&desired, &before, mode);
                for attribute in delta.to_remove() {
                    assert!(!delta.to_set().contains_key(attribute));
                }

                let first = mgr.plan(&desired, &before, mode);
                let second = mgr.plan(&desired, &before, mode);
                assert_eq!(first.1, second.1);
                assert_eq!(first.0, delta);
            }
        }
    }
}

#[tokio::test]
async fn test_check_mode_sends_nothing() {
    let scenario = lldp_fixtures::documented_replaced();
    let device = MockDevice::new(scenario.before.clone());
    let mgr = LldpGlobalMgr::with_options(ReconcileOptions {
        check_mode: true,
        ..Default::default()
    });

    let report = run(&mgr, &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert_eq!(report.outcome, Outcome::Planned);
    assert!(report.changed);
    assert_eq!(report.after, scenario.expected_after);
    assert_eq!(command_strings(&report.commands), scenario.expected_commands);
    assert_eq!(device.batch_count(), 0);
    assert_eq!(device.config(), scenario.before);
}

#[tokio::test]
async fn test_refetch_reads_device_twice() {
    let scenario = lldp_fixtures::documented_merged();
    let device = MockDevice::new(scenario.before.clone());
    run(&LldpGlobalMgr::new(), &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert_eq!(device.show_count(), 2);

    let device = MockDevice::new(scenario.before.clone());
    let mgr = LldpGlobalMgr::with_options(ReconcileOptions {
        after_state: AfterState::Project,
        ..Default::default()
    });
    let report = run(&mgr, &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert_eq!(device.show_count(), 1);
    assert_eq!(report.after, scenario.expected_after);
}

#[tokio::test]
async fn test_rejected_batch_reports_failure_then_recovers() {
    let scenario = lldp_fixtures::documented_replaced();
    let device = MockDevice::new(scenario.before.clone());
    device.reject_command("no lldp tlv-select port-description");
    let mgr = LldpGlobalMgr::new();

    let report = run(&mgr, &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert!(report.is_failed());
    assert!(report.changed);
    assert_eq!(report.after, report.before);
    assert_eq!(command_strings(&report.commands), scenario.expected_commands);
    let error = report.error.unwrap();
    assert!(error.contains("no lldp tlv-select port-description"), "{}", error);

    // The device kept the commands that preceded the rejected one.
    device.clear_rejection();
    device.clear_log();
    let report = run(&mgr, &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert_eq!(report.outcome, Outcome::Applied);
    assert_eq!(
        command_strings(&report.commands),
        vec![
            "no lldp tlv-select port-description",
            "lldp tlv-select system-description",
        ]
    );
    assert_eq!(device.config(), scenario.expected_after);
}

#[tokio::test]
async fn test_refetch_failure_keeps_applied_report() {
    let scenario = lldp_fixtures::documented_merged();
    let device = MockDevice::new(scenario.before.clone());
    device.fail_show_after(1);

    let report = run(&LldpGlobalMgr::new(), &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();
    assert_eq!(report.outcome, Outcome::Applied);
    assert!(report.changed);
    assert_eq!(command_strings(&report.commands), scenario.expected_commands);
    assert_eq!(device.captured_commands(), scenario.expected_commands);
    assert_eq!(report.after, scenario.expected_after);
    assert_eq!(device.config(), scenario.expected_after);
    assert_eq!(device.show_count(), 2);
    let error = report.error.unwrap();
    assert!(error.starts_with("Failed to fetch current configuration"), "{}", error);
}

#[tokio::test]
async fn test_fetch_failure_aborts_before_apply() {
    let device = MockDevice::new(lldp_fixtures::documented_before());
    device.fail_show(true);

    let err = run(
        &LldpGlobalMgr::new(),
        &device,
        &lldp_fixtures::documented_desired(),
        ReconciliationMode::Merged,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, NetCfgError::Fetch { .. }));
    assert!(err.is_transient());
    assert_eq!(device.batch_count(), 0);
}

#[tokio::test]
async fn test_report_serializes_for_callers() {
    let scenario = lldp_fixtures::documented_merged();
    let device = MockDevice::new(scenario.before.clone());
    let report = run(&LldpGlobalMgr::new(), &device, &scenario.desired, scenario.mode)
        .await
        .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["changed"], true);
    assert_eq!(value["outcome"], "applied");
    assert_eq!(value["commands"][0], "no lldp tlv-select port-description");
    assert_eq!(value["before"]["timer"], 3000);
    assert_eq!(value["after"]["tlv_select"]["system_description"], true);
    assert!(value.get("error").is_none());
}
