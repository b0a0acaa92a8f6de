//! Normalized per-run time series and read-only views over it.

use chrono::{NaiveDate, NaiveDateTime};
use std::ops::Range;
use tb_core::Real;

use crate::columns::ColumnMap;
use crate::table::RawTable;
use crate::timestamp::{parse_date, parse_timestamp};
use crate::{SeriesError, SeriesResult};

/// One recorded sample as seen through a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the view's origin (run start for the full view)
    pub elapsed_s: Real,
    pub input_c: Real,
    pub output_c: Real,
    /// `None` exactly when the run has no reservoir channel
    pub reservoir_c: Option<Real>,
}

/// Channels of one run, stored column-wise in recording order.
///
/// Elapsed time is computed once at construction from the absolute
/// timestamps; it is zero at the first sample and non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    date: NaiveDate,
    started_at: NaiveDateTime,
    elapsed_s: Vec<Real>,
    input_c: Vec<Real>,
    output_c: Vec<Real>,
    reservoir_c: Option<Vec<Real>>,
}

/// Build a normalized series from a raw recording table.
pub fn build(table: &RawTable) -> SeriesResult<TimeSeries> {
    let columns = ColumnMap::resolve(&table.headers)?;
    if table.rows.is_empty() {
        return Err(SeriesError::Empty);
    }

    let n = table.rows.len();
    let mut timestamps = Vec::with_capacity(n);
    let mut input_c = Vec::with_capacity(n);
    let mut output_c = Vec::with_capacity(n);

    for row in 0..n {
        let date_cell = table.cell(row, columns.date);
        let time_cell = table.cell(row, columns.time);
        let ts = parse_timestamp(date_cell, time_cell).ok_or_else(|| SeriesError::InvalidCell {
            row: row + 1,
            column: "Time",
            value: time_cell.to_string(),
        })?;
        timestamps.push(ts);
        input_c.push(numeric_cell(table, row, columns.input, "Input (°C)")?);
        output_c.push(numeric_cell(table, row, columns.output, "Output (°C)")?);
    }

    let reservoir_c = match columns.reservoir {
        Some(col) if (0..n).any(|row| !table.cell(row, col).is_empty()) => Some(
            (0..n)
                .map(|row| numeric_cell(table, row, col, "Reservoir (°C)"))
                .collect::<SeriesResult<Vec<_>>>()?,
        ),
        Some(_) => {
            tracing::debug!("reservoir column present but blank; treating as absent");
            None
        }
        None => None,
    };

    // The run date is the first Date cell, falling back to the first timestamp.
    let date = parse_date(table.cell(0, columns.date)).unwrap_or_else(|| timestamps[0].date());

    TimeSeries::from_timestamps(date, &timestamps, input_c, output_c, reservoir_c)
}

fn numeric_cell(table: &RawTable, row: usize, column: usize, name: &'static str) -> SeriesResult<Real> {
    let text = table.cell(row, column);
    text.parse::<Real>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| SeriesError::InvalidCell {
            row: row + 1,
            column: name,
            value: text.to_string(),
        })
}

impl TimeSeries {
    /// Normalize absolute timestamps to elapsed seconds since the first one.
    pub fn from_timestamps(
        date: NaiveDate,
        timestamps: &[NaiveDateTime],
        input_c: Vec<Real>,
        output_c: Vec<Real>,
        reservoir_c: Option<Vec<Real>>,
    ) -> SeriesResult<Self> {
        let Some(&started_at) = timestamps.first() else {
            return Err(SeriesError::Empty);
        };

        let mut elapsed_s = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let offset = (*ts - started_at).num_microseconds().map(|us| us as Real / 1e6);
            let Some(offset) = offset else {
                return Err(SeriesError::InvalidCell {
                    row: i + 1,
                    column: "Time",
                    value: ts.to_string(),
                });
            };
            if elapsed_s.last().is_some_and(|prev| offset < *prev) {
                return Err(SeriesError::NonMonotonic { row: i + 1 });
            }
            elapsed_s.push(offset);
        }

        Self::assemble(date, started_at, elapsed_s, input_c, output_c, reservoir_c)
    }

    /// Synthetic series from already-relative sample times.
    ///
    /// The first entry is taken as the run start; later entries are re-based
    /// against it so the invariants match [`TimeSeries::from_timestamps`].
    pub fn from_elapsed(
        elapsed_s: Vec<Real>,
        input_c: Vec<Real>,
        output_c: Vec<Real>,
        reservoir_c: Option<Vec<Real>>,
    ) -> SeriesResult<Self> {
        let Some(&first) = elapsed_s.first() else {
            return Err(SeriesError::Empty);
        };
        let mut prev = first;
        for (i, &t) in elapsed_s.iter().enumerate() {
            if !t.is_finite() {
                return Err(SeriesError::InvalidCell {
                    row: i + 1,
                    column: "Time",
                    value: t.to_string(),
                });
            }
            if t < prev {
                return Err(SeriesError::NonMonotonic { row: i + 1 });
            }
            prev = t;
        }
        let rebased = elapsed_s.iter().map(|t| t - first).collect();
        let started_at = NaiveDateTime::default();
        Self::assemble(started_at.date(), started_at, rebased, input_c, output_c, reservoir_c)
    }

    fn assemble(
        date: NaiveDate,
        started_at: NaiveDateTime,
        elapsed_s: Vec<Real>,
        input_c: Vec<Real>,
        output_c: Vec<Real>,
        reservoir_c: Option<Vec<Real>>,
    ) -> SeriesResult<Self> {
        let n = elapsed_s.len();
        if input_c.len() != n {
            return Err(SeriesError::LengthMismatch { what: "input" });
        }
        if output_c.len() != n {
            return Err(SeriesError::LengthMismatch { what: "output" });
        }
        if reservoir_c.as_ref().is_some_and(|r| r.len() != n) {
            return Err(SeriesError::LengthMismatch { what: "reservoir" });
        }
        Ok(Self {
            date,
            started_at,
            elapsed_s,
            input_c,
            output_c,
            reservoir_c,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.elapsed_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed_s.is_empty()
    }

    pub fn has_reservoir(&self) -> bool {
        self.reservoir_c.is_some()
    }

    /// Whole run, elapsed from run start.
    pub fn view(&self) -> SeriesView<'_> {
        SeriesView {
            series: self,
            range: 0..self.len(),
            origin_s: 0.0,
        }
    }
}

/// Contiguous, read-only window over a [`TimeSeries`].
///
/// Every filter used by the reduction is a threshold on elapsed time, which
/// is monotone, so a window is always a contiguous index range.
#[derive(Debug, Clone)]
pub struct SeriesView<'a> {
    series: &'a TimeSeries,
    range: Range<usize>,
    origin_s: Real,
}

impl<'a> SeriesView<'a> {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn series(&self) -> &'a TimeSeries {
        self.series
    }

    /// Elapsed time of the view origin, measured from run start.
    pub fn origin_s(&self) -> Real {
        self.origin_s
    }

    pub fn has_reservoir(&self) -> bool {
        self.series.has_reservoir()
    }

    pub fn elapsed_s(&self) -> impl Iterator<Item = Real> + '_ {
        self.series.elapsed_s[self.range.clone()]
            .iter()
            .map(move |t| t - self.origin_s)
    }

    pub fn input_c(&self) -> &'a [Real] {
        &self.series.input_c[self.range.clone()]
    }

    pub fn output_c(&self) -> &'a [Real] {
        &self.series.output_c[self.range.clone()]
    }

    pub fn reservoir_c(&self) -> Option<&'a [Real]> {
        self.series
            .reservoir_c
            .as_deref()
            .map(|r| &r[self.range.clone()])
    }

    pub fn get(&self, index: usize) -> Option<Sample> {
        if index >= self.len() {
            return None;
        }
        let i = self.range.start + index;
        Some(Sample {
            elapsed_s: self.series.elapsed_s[i] - self.origin_s,
            input_c: self.series.input_c[i],
            output_c: self.series.output_c[i],
            reservoir_c: self.series.reservoir_c.as_ref().map(|r| r[i]),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Samples with elapsed time `>= start_s` (in this view's time base).
    pub fn since(&self, start_s: Real) -> SeriesView<'a> {
        let offset = self.partition(|t| t < start_s);
        SeriesView {
            series: self.series,
            range: self.range.start + offset..self.range.end,
            origin_s: self.origin_s,
        }
    }

    /// Samples with elapsed time in the closed window `[start_s, end_s]`.
    pub fn window(&self, start_s: Real, end_s: Real) -> SeriesView<'a> {
        let lo = self.partition(|t| t < start_s);
        let hi = self.partition(|t| t <= end_s).max(lo);
        SeriesView {
            series: self.series,
            range: self.range.start + lo..self.range.start + hi,
            origin_s: self.origin_s,
        }
    }

    /// Same samples, with elapsed time re-based to zero at the first one.
    pub fn rebased(&self) -> SeriesView<'a> {
        let origin_s = self
            .series
            .elapsed_s
            .get(self.range.start)
            .copied()
            .filter(|_| !self.is_empty())
            .unwrap_or(self.origin_s);
        SeriesView {
            series: self.series,
            range: self.range.clone(),
            origin_s,
        }
    }

    fn partition(&self, pred: impl Fn(Real) -> bool) -> usize {
        self.series.elapsed_s[self.range.clone()]
            .partition_point(|t| pred(t - self.origin_s))
    }
}
