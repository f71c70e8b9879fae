use chrono::NaiveDate;
use clap::Parser;
use digipine_synth::cli::{parse_date, validate_label, Args, Command, ListTarget, OutputFormat};

#[test]
fn accepts_safe_label_chars() {
    validate_label("local-main_20260227.1").expect("label should be valid");
}

#[test]
fn rejects_path_traversal_and_separators() {
    for label in ["../escape", "a/b", "a\\b", "", " space", ".."] {
        let err = validate_label(label).expect_err("label should be rejected");
        assert!(
            err.to_string().contains("label"),
            "unexpected error for '{label}': {err}"
        );
    }
}

#[test]
fn dates_must_be_iso() {
    assert_eq!(
        parse_date("2025-03-14").expect("iso date"),
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    );
    for bad in ["14/03/2025", "2025-02-30", ""] {
        let err = parse_date(bad).expect_err("should be rejected");
        assert!(err.contains("YYYY-MM-DD"), "{err}");
    }
}

#[test]
fn generate_defaults_to_the_landing_selection() {
    let args = Args::try_parse_from(["digipine-synth", "generate"]).expect("parse");
    assert_eq!(args.label, "local");
    match args.command {
        Command::Generate {
            selection,
            strict,
            raw,
            format,
            ..
        } => {
            assert_eq!(selection.key().seed_key(), "cocacola|all|7days|all");
            assert!(selection.date.is_none());
            assert!(!strict && !raw);
            assert_eq!(format, OutputFormat::Json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn selection_flags_are_trimmed() {
    let args = Args::try_parse_from([
        "digipine-synth",
        "markers",
        "--product",
        " lays ",
        "--region",
        "pune",
        "--window",
        "90days",
        "--platform",
        "swiggy",
        "--date",
        "2025-01-31",
    ])
    .expect("parse");
    let Command::Markers { selection } = args.command else {
        panic!("expected markers command");
    };
    assert_eq!(selection.key().seed_key(), "lays|pune|90days|swiggy");
    assert_eq!(selection.date, NaiveDate::from_ymd_opt(2025, 1, 31));
}

#[test]
fn list_and_sweep_options() {
    let args = Args::try_parse_from(["digipine-synth", "list", "regions"]).expect("parse");
    assert!(matches!(
        args.command,
        Command::List {
            target: ListTarget::Regions
        }
    ));

    let args = Args::try_parse_from(["digipine-synth", "sweep", "--count", "5", "--seed", "9"])
        .expect("parse");
    match args.command {
        Command::Sweep {
            count,
            seed,
            iterations,
            ..
        } => assert_eq!((count, seed, iterations), (5, 9, 2)),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn bad_date_is_a_usage_error() {
    let err = Args::try_parse_from(["digipine-synth", "generate", "--date", "yesterday"])
        .expect_err("bad date");
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}
