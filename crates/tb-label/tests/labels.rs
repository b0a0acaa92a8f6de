use tb_label::{LabelError, RunParameters, parse_label};

#[test]
fn bench_file_names_parse() {
    let cases = [
        ("92ml_m 10C battA4 disp6.xlsx", RunParameters::new(92, 10, "A4").with_disposable("6")),
        ("92 10 A4 6.xlsx", RunParameters::new(92, 10, "A4").with_disposable("6")),
        (
            "120ml_m 4C battB2 disp14 unit7 trial3.xlsx",
            RunParameters::new(120, 4, "B2")
                .with_disposable("14")
                .with_unit("7")
                .with_trial("3"),
        ),
        ("45 37 C9.csv", RunParameters::new(45, 37, "C9")),
    ];

    for (label, expected) in cases {
        let parsed = parse_label(label).unwrap_or_else(|e| panic!("{label}: {e}"));
        assert_eq!(parsed, expected, "{label}");
    }
}

#[test]
fn canonical_label_parses_back() {
    let params = RunParameters::new(92, 10, "A4")
        .with_disposable("6")
        .with_trial("2");
    let label = format!("{params}.xlsx");
    assert_eq!(label, "92ml_m 10C battA4 disp6 trial2.xlsx");
    assert_eq!(parse_label(&label).unwrap(), params);

    let trial_only = RunParameters::new(92, 10, "A4").with_trial("2");
    assert_eq!(trial_only.to_string(), "92ml_m 10C battA4 trial2");
    assert_eq!(parse_label(&trial_only.to_string()).unwrap(), trial_only);

    let unit_only = RunParameters::new(92, 10, "A4").with_unit("3");
    assert_eq!(parse_label(&unit_only.to_string()).unwrap(), unit_only);

    let minimal = RunParameters::new(60, 4, "C1");
    assert_eq!(parse_label(&minimal.to_string()).unwrap(), minimal);
}

#[test]
fn malformed_labels_are_rejected() {
    for label in ["", "notes.xlsx", "92ml_m.xlsx", "92 hot A4.xlsx"] {
        let err = parse_label(label).unwrap_err();
        assert!(
            matches!(err, LabelError::Missing { .. } | LabelError::NotNumeric { .. }),
            "{label}: {err:?}"
        );
    }
}
