//! Shared application service layer for thermobench.
//!
//! This crate turns bench recordings into summary records: it orchestrates
//! label parsing, series construction, event detection and aggregation for
//! a single run, applies the edge-case policy, and drives batches of runs
//! into an output table without letting one bad run stop the others.

pub mod batch;
pub mod config;
pub mod error;
pub mod inspect;
pub mod progress;
pub mod summary;

pub use batch::{BatchOptions, BatchReport, SkippedRun, reduce_batch, reduce_file};
pub use config::{load_policy, save_policy};
pub use error::{AppError, AppResult, RunError, RunResult};
pub use inspect::{RunInspection, inspect_recording};
pub use progress::{BatchProgressEvent, BatchStage};
pub use summary::{ReducedRun, reduce_run};
