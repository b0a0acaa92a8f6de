//! Output table persistence.
//!
//! The table is a CSV file with [`TITLES`] as header. Appending a record
//! writes the header when the file is new and the row otherwise, then
//! flushes before returning.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::record::{SummaryRecord, TITLES};
use crate::{ResultsError, ResultsResult};

const LABEL_COLUMN: usize = 16;

pub struct SummaryTable {
    path: Option<PathBuf>,
    labels: HashSet<String>,
    rows: usize,
}

impl SummaryTable {
    /// Table that only tracks labels, without a backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            labels: HashSet::new(),
            rows: 0,
        }
    }

    /// Open (or prepare to create) the table at `path`.
    ///
    /// An existing non-empty file must carry the expected header; its
    /// labels are loaded so already-summarised runs can be recognised.
    pub fn open(path: &Path) -> ResultsResult<Self> {
        let mut table = Self {
            path: Some(path.to_path_buf()),
            labels: HashSet::new(),
            rows: 0,
        };
        if !path.exists() || fs::metadata(path)?.len() == 0 {
            return Ok(table);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        check_header(path, reader.headers()?)?;
        for record in reader.records() {
            let record = record?;
            if let Some(label) = record.get(LABEL_COLUMN) {
                table.labels.insert(label.to_string());
            }
            table.rows += 1;
        }
        tracing::debug!(path = %path.display(), rows = table.rows, "opened summary table");
        Ok(table)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// Append one record and persist it.
    pub fn append(&mut self, record: &SummaryRecord) -> ResultsResult<()> {
        if let Some(path) = &self.path {
            let write_header = !path.exists() || fs::metadata(path)?.len() == 0;
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let mut writer = csv::WriterBuilder::new().from_writer(file);
            if write_header {
                writer.write_record(TITLES)?;
            }
            writer.write_record(record.to_row())?;
            writer.flush()?;
        }
        self.labels.insert(record.source_label.clone());
        self.rows += 1;
        Ok(())
    }
}

fn check_header(path: &Path, header: &csv::StringRecord) -> ResultsResult<()> {
    for (column, expected) in TITLES.iter().enumerate() {
        let found = header.get(column).unwrap_or("");
        if found.trim() != *expected {
            return Err(ResultsError::HeaderMismatch {
                path: path.display().to_string(),
                column,
                expected,
                found: found.to_string(),
            });
        }
    }
    Ok(())
}

/// `<stem>.summary.csv` next to a recording.
pub fn sidecar_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}.summary.csv"))
}

/// Write a single-run summary next to its recording. Refuses to overwrite.
pub fn write_sidecar(input: &Path, record: &SummaryRecord) -> ResultsResult<PathBuf> {
    let path = sidecar_path(input);
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => ResultsError::AlreadyExists {
                path: path.display().to_string(),
            },
            _ => ResultsError::Io(e),
        })?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);
    writer.write_record(TITLES)?;
    writer.write_record(record.to_row())?;
    writer.flush()?;
    Ok(path)
}

pub fn export_json(path: &Path, records: &[SummaryRecord]) -> ResultsResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}
