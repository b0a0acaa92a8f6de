//! Batch driver: many recordings into one output table.
//!
//! Runs are reduced independently, sequentially or on the rayon pool.
//! Appending to the output table (and writing the optional sidecar) is the
//! only shared step and happens under a single lock.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use tb_analysis::ReductionPolicy;
use tb_label::parse_label;
use tb_results::{SummaryRecord, SummaryTable, sidecar_path, write_sidecar};
use tb_series::{DEFAULT_SKIP_ROWS, RawTable, build};

use crate::error::{AppResult, RunError, RunResult};
use crate::progress::{BatchProgressEvent, BatchStage};
use crate::summary::{ReducedRun, reduce_run};

/// Options for a batch reduction.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub policy: ReductionPolicy,
    /// Leading non-data rows above the header in each recording
    pub skip_rows: usize,
    pub parallel: bool,
    /// Skip runs whose label is already in the table or that have a sidecar
    pub skip_processed: bool,
    /// Write `<stem>.summary.csv` next to each recording
    pub write_sidecar: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            policy: ReductionPolicy::default(),
            skip_rows: DEFAULT_SKIP_ROWS,
            parallel: false,
            skip_processed: true,
            write_sidecar: false,
        }
    }
}

/// A run that produced no record.
#[derive(Debug)]
pub struct SkippedRun {
    pub input: PathBuf,
    pub reason: RunError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Appended runs with their diagnostics, in input order
    pub runs: Vec<ReducedRun>,
    pub skipped: Vec<SkippedRun>,
    /// Inputs already summarised before this batch
    pub duplicates: Vec<PathBuf>,
}

impl BatchReport {
    /// Records of the appended runs, in input order.
    pub fn records(&self) -> Vec<SummaryRecord> {
        self.runs.iter().map(|run| run.record.clone()).collect()
    }
}

enum Outcome {
    Appended(Box<ReducedRun>),
    Skipped(RunError),
    Duplicate,
}

type ProgressFn<'a> = &'a (dyn Fn(BatchProgressEvent) + Sync);

struct Progress<'a> {
    callback: Option<ProgressFn<'a>>,
    started: Instant,
    total: usize,
    finished: Mutex<usize>,
}

impl Progress<'_> {
    fn emit(&self, stage: BatchStage, input: Option<&Path>, message: Option<String>) {
        let Some(cb) = self.callback else {
            return;
        };
        let finished = match stage {
            BatchStage::Appending | BatchStage::Skipped => {
                let mut count = self.finished.lock().unwrap_or_else(|e| e.into_inner());
                *count += 1;
                *count
            }
            _ => *self.finished.lock().unwrap_or_else(|e| e.into_inner()),
        };
        cb(BatchProgressEvent {
            stage,
            input: input.map(Path::to_path_buf),
            finished,
            total: self.total,
            elapsed_wall_s: self.started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Reduce one recording file. The label is the file name.
pub fn reduce_file(path: &Path, options: &BatchOptions) -> RunResult<ReducedRun> {
    let label = file_label(path);
    let params = parse_label(&label)?;
    let table = RawTable::from_path(path, options.skip_rows)?;
    let series = build(&table)?;
    reduce_run(&params, &label, &series, &options.policy)
}

/// Reduce every input and append the results to `table`.
///
/// Per-run failures are collected in the report; only an invalid policy
/// fails the batch.
pub fn reduce_batch(
    inputs: &[PathBuf],
    table: &mut SummaryTable,
    options: &BatchOptions,
    progress: Option<ProgressFn<'_>>,
) -> AppResult<BatchReport> {
    options.policy.validate()?;

    let progress = Progress {
        callback: progress,
        started: Instant::now(),
        total: inputs.len(),
        finished: Mutex::new(0),
    };
    let shared = Mutex::new(table);

    let process = |input: &PathBuf| -> Outcome {
        let label = file_label(input);
        {
            let table = shared.lock().unwrap_or_else(|e| e.into_inner());
            if options.skip_processed && already_processed(&table, input, &label) {
                drop(table);
                tracing::warn!(input = %input.display(), "already summarised; skipping");
                progress.emit(BatchStage::Skipped, Some(input), Some("already summarised".into()));
                return Outcome::Duplicate;
            }
        }

        progress.emit(BatchStage::Reading, Some(input), None);
        let reduced = match reduce_file(input, options) {
            Ok(run) => run,
            Err(err) => {
                tracing::warn!(input = %input.display(), %err, "skipping run");
                progress.emit(BatchStage::Skipped, Some(input), Some(err.to_string()));
                return Outcome::Skipped(err);
            }
        };
        progress.emit(BatchStage::Reducing, Some(input), None);

        // append-then-persist
        let mut table = shared.lock().unwrap_or_else(|e| e.into_inner());
        if options.skip_processed && already_processed(&table, input, &label) {
            drop(table);
            progress.emit(BatchStage::Skipped, Some(input), Some("already summarised".into()));
            return Outcome::Duplicate;
        }
        if let Err(err) = table.append(&reduced.record) {
            drop(table);
            tracing::error!(input = %input.display(), %err, "failed to persist summary");
            progress.emit(BatchStage::Skipped, Some(input), Some(err.to_string()));
            return Outcome::Skipped(err.into());
        }
        // The row is in the table from here on; a sidecar failure is only
        // reported.
        if options.write_sidecar {
            if let Err(err) = write_sidecar(input, &reduced.record) {
                tracing::warn!(input = %input.display(), %err, "sidecar summary not written");
            }
        }
        drop(table);

        tracing::info!(
            input = %input.display(),
            startup = %reduced.record.startup_s,
            delivery_s = %reduced.record.sustained_delivery_s,
            "run summarised"
        );
        progress.emit(BatchStage::Appending, Some(input), None);
        Outcome::Appended(Box::new(reduced))
    };

    let outcomes: Vec<Outcome> = if options.parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    };

    let mut report = BatchReport::default();
    for (input, outcome) in inputs.iter().zip(outcomes) {
        match outcome {
            Outcome::Appended(run) => report.runs.push(*run),
            Outcome::Skipped(reason) => report.skipped.push(SkippedRun {
                input: input.clone(),
                reason,
            }),
            Outcome::Duplicate => report.duplicates.push(input.clone()),
        }
    }

    tracing::info!(
        appended = report.runs.len(),
        skipped = report.skipped.len(),
        duplicates = report.duplicates.len(),
        "batch complete"
    );
    progress.emit(BatchStage::Completed, None, None);
    Ok(report)
}

fn already_processed(table: &SummaryTable, input: &Path, label: &str) -> bool {
    table.contains_label(label) || sidecar_path(input).exists()
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
