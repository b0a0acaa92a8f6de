//! Error types for the tb-app service layer.

use std::path::PathBuf;

/// Batch-level error: configuration or output table problems that stop the
/// whole invocation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file: {path}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid reduction policy: {0}")]
    Policy(#[from] tb_analysis::PolicyError),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run failed: {0}")]
    Run(#[from] RunError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tb-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<tb_results::ResultsError> for AppError {
    fn from(err: tb_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Error fatal to a single run. The batch records it and moves on.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Invalid label: {0}")]
    Label(#[from] tb_label::LabelError),

    #[error("Invalid recording: {0}")]
    Series(#[from] tb_series::SeriesError),

    #[error("Cannot reduce run: {0}")]
    Metric(#[from] tb_analysis::MetricError),

    #[error("Failed to persist summary: {0}")]
    Persist(#[from] tb_results::ResultsError),
}

pub type RunResult<T> = Result<T, RunError>;
