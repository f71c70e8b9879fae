use digipine_synth::results::{SweepReport, SCHEMA_VERSION};

#[test]
fn schema_v1_sweep_report_parses_and_round_trips() {
    let payload = r#"
{
  "schema_version": 1,
  "context": {
    "schema_version": 1,
    "label": "ci-run",
    "created_at": "2026-02-27T22:48:22.208400Z",
    "catalog_source": "builtin",
    "generator_version": "0.1.0",
    "as_of": "2025-03-14"
  },
  "seed": 42,
  "cases": [
    {
      "case": "cocacola-all-7days-all",
      "selection": {
        "product": "cocacola",
        "region": "all",
        "time_window": "7days",
        "platform": "all"
      },
      "success": true,
      "samples": [
        { "elapsed_ms": 0.4, "fingerprint": "ab12" },
        { "elapsed_ms": 0.3, "fingerprint": "ab12" }
      ],
      "failure": null
    },
    {
      "case": "lays-pune-24h-zepto",
      "selection": {
        "product": "lays",
        "region": "pune",
        "time_window": "24h",
        "platform": "zepto"
      },
      "success": false,
      "samples": [],
      "failure": { "message": "fingerprint changed between runs: ab vs cd" }
    }
  ]
}
"#;

    let report: SweepReport = serde_json::from_str(payload).expect("parse v1 report");
    assert_eq!(report.schema_version, SCHEMA_VERSION);
    assert_eq!(report.context.label, "ci-run");
    assert_eq!(report.cases[0].selection.seed_key(), "cocacola|all|7days|all");

    let failed: Vec<_> = report.failed_cases().map(|c| c.case.as_str()).collect();
    assert_eq!(failed, vec!["lays-pune-24h-zepto"]);

    let encoded = serde_json::to_string(&report).expect("encode");
    let reparsed: SweepReport = serde_json::from_str(&encoded).expect("reparse");
    assert_eq!(reparsed.cases.len(), 2);
    assert_eq!(reparsed.context.as_of, report.context.as_of);
}
