//! End-to-end batch reduction over recordings written to a temp directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use tb_app::{BatchOptions, BatchProgressEvent, BatchStage, RunError, reduce_batch, reduce_file};
use tb_core::Reading;
use tb_label::parse_label;
use tb_results::{SummaryTable, sidecar_path};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn logger_header() -> String {
    let mut text = String::new();
    for line in ["Logger,TC-08", "Serial,A1234", "Interval,1 s", "", "", ""] {
        text.push_str(line);
        text.push_str(",,,\n");
    }
    text
}

/// 1 Hz run: 20 s warm-up at 30 °C, 900 s at 40 °C, then 60 s at 20 °C.
fn write_hot_run(dir: &Path, name: &str) -> PathBuf {
    let mut text = logger_header();
    text.push_str("Date,Time,Input (°C),Output (°C),Reservoir (°C)\n");
    for i in 0..980u32 {
        let output = match i {
            0..20 => 30.0,
            20..920 => 40.0,
            _ => 20.0,
        };
        let secs = 9 * 3600 + i;
        text.push_str(&format!(
            "3/18/2024,{:02}:{:02}:{:02},10.0,{:.1},22.0\n",
            secs / 3600,
            secs / 60 % 60,
            secs % 60,
            output
        ));
    }
    let path = dir.join(name);
    fs::write(&path, text).expect("failed to write recording");
    path
}

fn write_without_output(dir: &Path, name: &str) -> PathBuf {
    let mut text = logger_header();
    text.push_str("Date,Time,Input (°C),Reservoir (°C)\n");
    text.push_str("3/18/2024,09:00:00,10.0,22.0\n");
    let path = dir.join(name);
    fs::write(&path, text).expect("failed to write recording");
    path
}

#[test]
fn single_file_is_reduced() {
    let dir = unique_temp_dir("tb_app_single");
    let path = write_hot_run(&dir, "92ml_m 10C battA4 disp6 trial1.csv");

    let run = reduce_file(&path, &BatchOptions::default()).expect("run should reduce");
    let record = run.record;
    assert_eq!(record.flow_rate_ml_min, 92);
    assert_eq!(record.battery_id, "A4");
    assert_eq!(record.trial_id.as_deref(), Some("1"));
    assert_eq!(record.input_mean_c, 10.0);
    assert_eq!(record.steady_state_mean_c, Reading::Value(40.0));
    assert_eq!(record.reservoir_mean_c, Reading::Value(22.0));
    assert_eq!(record.startup_s, Reading::Value(20.0));
    assert_eq!(record.sustained_delivery_s, Reading::Value(899.0));
    assert_eq!(record.fluid_infused_ml, Reading::Value(1378.47));
    assert_eq!(record.battery_s, Reading::Value(920.0));
    assert_eq!(record.source_label, "92ml_m 10C battA4 disp6 trial1.csv");
}

#[test]
fn bad_runs_are_skipped_and_the_rest_appended() {
    let dir = unique_temp_dir("tb_app_batch");
    let inputs = vec![
        write_hot_run(&dir, "92ml_m 10C battA4 disp6.csv"),
        write_hot_run(&dir, "not a label.csv"),
        write_without_output(&dir, "50ml_m 15C battB2.csv"),
        write_hot_run(&dir, "50ml_m 15C battB3 disp1 unit7.csv"),
    ];
    let output = dir.join("summary.csv");
    let mut table = SummaryTable::open(&output).expect("open table");

    let report = reduce_batch(&inputs, &mut table, &BatchOptions::default(), None)
        .expect("batch should complete");

    assert_eq!(report.runs.len(), 2);
    assert_eq!(report.runs[0].record.battery_id, "A4");
    assert_eq!(report.runs[1].record.battery_id, "B3");
    assert!(report.runs[0].reached_operating_temp);
    assert!(report.runs[0].outcomes.is_empty());
    assert!(report.runs[0].sampling.is_some_and(|s| s.is_uniform()));
    assert_eq!(report.skipped.len(), 2);
    assert!(matches!(report.skipped[0].reason, RunError::Label(_)));
    assert!(matches!(report.skipped[1].reason, RunError::Series(_)));
    assert!(report.duplicates.is_empty());

    let reopened = SummaryTable::open(&output).expect("reopen table");
    assert_eq!(reopened.len(), 2);
    assert!(reopened.contains_label("92ml_m 10C battA4 disp6.csv"));
}

#[test]
fn second_pass_finds_only_duplicates() {
    let dir = unique_temp_dir("tb_app_dupes");
    let inputs = vec![
        write_hot_run(&dir, "92ml_m 10C battA4.csv"),
        write_hot_run(&dir, "92ml_m 10C battA5.csv"),
    ];
    let output = dir.join("summary.csv");
    let options = BatchOptions::default();

    let mut table = SummaryTable::open(&output).unwrap();
    let first = reduce_batch(&inputs, &mut table, &options, None).unwrap();
    assert_eq!(first.runs.len(), 2);

    let mut table = SummaryTable::open(&output).unwrap();
    let second = reduce_batch(&inputs, &mut table, &options, None).unwrap();
    assert!(second.runs.is_empty());
    assert_eq!(second.duplicates, inputs);
    assert_eq!(SummaryTable::open(&output).unwrap().len(), 2);
}

#[test]
fn sidecar_marks_run_as_processed() {
    let dir = unique_temp_dir("tb_app_sidecar");
    let input = write_hot_run(&dir, "92ml_m 10C battA4 disp6.csv");
    let options = BatchOptions {
        write_sidecar: true,
        ..BatchOptions::default()
    };

    let mut table = SummaryTable::in_memory();
    let report = reduce_batch(std::slice::from_ref(&input), &mut table, &options, None).unwrap();
    assert_eq!(report.runs.len(), 1);
    assert!(sidecar_path(&input).exists());

    // A fresh table still recognises the run through its sidecar.
    let mut table = SummaryTable::in_memory();
    let report = reduce_batch(std::slice::from_ref(&input), &mut table, &options, None).unwrap();
    assert!(report.runs.is_empty());
    assert_eq!(report.duplicates, vec![input]);
}

#[test]
fn forced_rerun_keeps_row_when_sidecar_exists() {
    let dir = unique_temp_dir("tb_app_forced_sidecar");
    let input = write_hot_run(&dir, "92ml_m 10C battA4 disp6.csv");
    let output = dir.join("summary.csv");
    let options = BatchOptions {
        write_sidecar: true,
        ..BatchOptions::default()
    };

    let mut table = SummaryTable::open(&output).unwrap();
    reduce_batch(std::slice::from_ref(&input), &mut table, &options, None).unwrap();
    assert!(sidecar_path(&input).exists());

    let forced = BatchOptions {
        skip_processed: false,
        ..options
    };
    let mut table = SummaryTable::open(&output).unwrap();
    let report = reduce_batch(std::slice::from_ref(&input), &mut table, &forced, None).unwrap();

    assert_eq!(report.runs.len(), 1);
    assert!(report.skipped.is_empty());
    assert_eq!(SummaryTable::open(&output).unwrap().len(), 2);
}

#[test]
fn source_label_reparses_to_record_parameters() {
    let dir = unique_temp_dir("tb_app_label_roundtrip");
    for name in [
        "92ml_m 10C battA4 disp6.csv",
        "92 10 A4 6.csv",
        "92ml_m 10C battA4 disp6 trial1.csv",
        "50ml_m 15C battB3 unit7.csv",
    ] {
        let path = write_hot_run(&dir, name);
        let record = reduce_file(&path, &BatchOptions::default())
            .unwrap_or_else(|e| panic!("{name}: {e}"))
            .record;
        let reparsed = parse_label(&record.source_label).expect("source label parses");
        assert_eq!(reparsed, record.parameters(), "{name}");
        assert_eq!(
            parse_label(&record.parameters().to_string()).unwrap(),
            record.parameters(),
            "{name}"
        );
    }
}

#[test]
fn parallel_batch_keeps_input_order() {
    let dir = unique_temp_dir("tb_app_parallel");
    let inputs: Vec<PathBuf> = (1..=6)
        .map(|i| write_hot_run(&dir, &format!("92ml_m 10C batt{i} disp1.csv")))
        .collect();
    let output = dir.join("summary.csv");
    let options = BatchOptions {
        parallel: true,
        ..BatchOptions::default()
    };

    let events = Mutex::new(Vec::new());
    let on_progress = |event: BatchProgressEvent| {
        events.lock().unwrap().push(event);
    };

    let mut table = SummaryTable::open(&output).unwrap();
    let report = reduce_batch(&inputs, &mut table, &options, Some(&on_progress)).unwrap();

    let batteries: Vec<&str> = report
        .runs
        .iter()
        .map(|run| run.record.battery_id.as_str())
        .collect();
    assert_eq!(batteries, vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(SummaryTable::open(&output).unwrap().len(), 6);

    let events = events.into_inner().unwrap();
    let last = events.last().expect("progress events");
    assert_eq!(last.stage, BatchStage::Completed);
    assert_eq!(last.finished, 6);
    assert_eq!(last.fraction_complete(), 1.0);
    let appended = events
        .iter()
        .filter(|e| e.stage == BatchStage::Appending)
        .count();
    assert_eq!(appended, 6);
}

#[test]
fn invalid_policy_fails_the_batch() {
    let mut options = BatchOptions::default();
    options.policy.debounce_s = 0.0;
    let mut table = SummaryTable::in_memory();
    let err = reduce_batch(&[], &mut table, &options, None).unwrap_err();
    assert!(matches!(err, tb_app::AppError::Policy(_)));
}
