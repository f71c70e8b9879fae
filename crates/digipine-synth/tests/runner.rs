use std::cell::Cell;

use chrono::NaiveDate;
use digipine_synth::catalog::ReferenceCatalog;
use digipine_synth::data::synth::generate_on;
use digipine_synth::error::SynthError;
use digipine_synth::markers::map_view;
use digipine_synth::output::{read_snapshot_report, read_sweep_report, write_report};
use digipine_synth::results::{RunContext, SnapshotReport, SweepReport, SCHEMA_VERSION};
use digipine_synth::runner::{generate_and_check, run_case, run_sweep, CaseExecutionResult, SweepOptions};
use digipine_synth::selection::SelectionKey;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
}

fn options(count: usize, iterations: u32) -> SweepOptions {
    SweepOptions {
        count,
        seed: 7,
        iterations,
        today: as_of(),
    }
}

#[test]
fn stable_fingerprints_succeed() {
    let key = SelectionKey::default();
    let result = run_case(&key, 3, || Ok::<_, String>("abc".to_string()));

    let case = match result {
        CaseExecutionResult::Success(case) => case,
        CaseExecutionResult::Failure(case) => panic!("unexpected failure: {:?}", case.failure),
    };
    assert_eq!(case.case, "cocacola-all-7days-all");
    assert_eq!(case.samples.len(), 3);
    assert!(case.failure.is_none());
}

#[test]
fn changing_fingerprint_fails_the_case() {
    let key = SelectionKey::default();
    let calls = Cell::new(0);
    let result = run_case(&key, 3, || {
        calls.set(calls.get() + 1);
        Ok::<_, String>(format!("run-{}", calls.get()))
    });

    let case = match result {
        CaseExecutionResult::Failure(case) => case,
        CaseExecutionResult::Success(_) => panic!("mismatched fingerprints should fail"),
    };
    assert!(!case.success);
    assert_eq!(case.samples.len(), 1);
    let message = case.failure.expect("failure recorded").message;
    assert!(message.contains("run-1 vs run-2"), "{message}");
}

#[test]
fn op_error_stops_the_case() {
    let key = SelectionKey::new("lays", "pune", "24h", "zepto");
    let result = run_case(&key, 4, || Err::<String, _>("boom"));
    let case = result.into_case();
    assert!(!case.success);
    assert!(case.samples.is_empty());
    assert_eq!(case.failure.expect("failure").message, "boom");
}

#[test]
fn generate_and_check_is_repeatable() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let key = SelectionKey::new("cocacola", "mumbai", "24h", "zepto");
    let first = generate_and_check(&key, &catalog, as_of()).expect("checks pass");
    let second = generate_and_check(&key, &catalog, as_of()).expect("checks pass");
    assert_eq!(first, second);
    assert_eq!(first.len(), 64);
    assert!(first.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')), "{first}");
}

#[test]
fn sweep_over_builtin_catalog_passes() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let cases = run_sweep(&catalog, &options(48, 2)).expect("sweep runs");
    assert_eq!(cases.len(), 48);
    for case in &cases {
        assert!(case.success, "{} failed: {:?}", case.case, case.failure);
        assert_eq!(case.samples.len(), 2);
    }
}

#[test]
fn sweep_rejects_degenerate_options() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    for opts in [options(0, 2), options(4, 1)] {
        let err = run_sweep(&catalog, &opts).expect_err("should be rejected");
        assert!(matches!(err, SynthError::InvalidArgument(_)), "{err}");
    }
}

#[test]
fn snapshot_report_round_trips_through_disk() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let key = SelectionKey::new("redbull", "delhi", "30days", "blinkit");
    let snapshot = generate_on(&key, &catalog, as_of());
    let report = SnapshotReport {
        schema_version: SCHEMA_VERSION,
        context: RunContext::new("ci", "builtin", as_of()),
        selection: key.clone(),
        fingerprint: snapshot.fingerprint().expect("fingerprint"),
        map: Some(map_view(&snapshot, &key, &catalog)),
        snapshot,
    };

    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_report(temp.path(), "ci", &key.slug(), &report).expect("write");
    assert_eq!(path, temp.path().join("ci").join("redbull-delhi-30days-blinkit.json"));

    let loaded = read_snapshot_report(&path).expect("read back");
    assert_eq!(loaded.selection, key);
    assert_eq!(loaded.fingerprint, report.fingerprint);
    assert_eq!(loaded.context.as_of, as_of());
    assert_eq!(loaded.snapshot.kpis, report.snapshot.kpis);
    assert_eq!(loaded.map.expect("map view").markers.len(), 5);
}

#[test]
fn sweep_report_round_trips_through_disk() {
    let catalog = ReferenceCatalog::builtin().expect("builtin catalog");
    let report = SweepReport {
        schema_version: SCHEMA_VERSION,
        context: RunContext::new("ci", "builtin", as_of()),
        seed: 7,
        cases: run_sweep(&catalog, &options(6, 2)).expect("sweep"),
    };
    let temp = tempfile::tempdir().expect("tempdir");
    let path = write_report(temp.path(), "ci", "sweep-7", &report).expect("write");
    let loaded = read_sweep_report(&path).expect("read back");
    assert_eq!(loaded.seed, 7);
    assert_eq!(loaded.cases.len(), 6);
    assert_eq!(loaded.failed_cases().count(), 0);
}

#[test]
fn write_report_rejects_unsafe_names() {
    let temp = tempfile::tempdir().expect("tempdir");
    for (label, name) in [("ci", "../x"), ("ci", ".."), ("ci", ""), ("../ci", "ok")] {
        let err = write_report(temp.path(), label, name, &1u32).expect_err("should be rejected");
        assert!(matches!(err, SynthError::InvalidArgument(_)), "{label}/{name}: {err}");
    }
}
