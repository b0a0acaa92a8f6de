//! Recording inspection without a label or an output table.

use std::path::Path;

use chrono::NaiveDateTime;
use tb_analysis::{
    ReductionPolicy, SamplingReport, battery_duration, peak_output, sampling, startup_time,
    sustained_delivery_end, trim_to_operational,
};
use tb_core::{Reading, Real};
use tb_series::{RawTable, TimeSeries, build};

use crate::error::RunResult;

/// What a recording looks like before it is summarised.
#[derive(Debug, Clone, PartialEq)]
pub struct RunInspection {
    pub started_at: NaiveDateTime,
    pub samples: usize,
    pub duration_s: Real,
    pub has_reservoir: bool,
    pub sampling: SamplingReport,
    pub peak_c: Real,
    pub startup_s: Reading<Real>,
    /// Delivery end relative to startup
    pub delivery_s: Reading<Real>,
    pub battery_s: Reading<Real>,
}

pub fn inspect_recording(
    path: &Path,
    skip_rows: usize,
    policy: &ReductionPolicy,
) -> RunResult<RunInspection> {
    let table = RawTable::from_path(path, skip_rows)?;
    let series = build(&table)?;
    inspect_series(&series, policy)
}

pub(crate) fn inspect_series(
    series: &TimeSeries,
    policy: &ReductionPolicy,
) -> RunResult<RunInspection> {
    let view = series.view();
    let peak_c = peak_output(&view)?;
    let duration_s = view.elapsed_s().last().unwrap_or(0.0);

    let startup_s: Reading<Real> = startup_time(&view, policy).ok().into();
    let delivery_s = match startup_s {
        Reading::Value(startup) => {
            sustained_delivery_end(&trim_to_operational(&view, startup), policy)
                .map_or(Reading::NotObserved, Reading::Value)
        }
        _ => Reading::NotApplicable,
    };
    let battery_s = if peak_c >= policy.operating_temp_c {
        battery_duration(&view, policy).map_or(Reading::NotObserved, Reading::Value)
    } else {
        Reading::NotApplicable
    };

    Ok(RunInspection {
        started_at: series.started_at(),
        samples: series.len(),
        duration_s,
        has_reservoir: series.has_reservoir(),
        sampling: sampling::inspect(&view, policy.sampling_tolerance_rel),
        peak_c,
        startup_s,
        delivery_s,
        battery_s,
    })
}
