//! Whole-run and windowed aggregates.

use tb_core::{Real, max, mean};
use tb_series::SeriesView;

use crate::{MetricError, MetricResult, ReductionPolicy};

/// Mean output temperature over the closed steady-state window.
pub fn steady_state_mean(view: &SeriesView<'_>, policy: &ReductionPolicy) -> MetricResult<Real> {
    let window = view.window(policy.steady_window_start_s, policy.steady_window_end_s);
    mean(window.output_c().iter().copied()).ok_or(MetricError::EmptyWindow {
        start_s: policy.steady_window_start_s,
        end_s: policy.steady_window_end_s,
    })
}

pub fn input_mean(view: &SeriesView<'_>) -> MetricResult<Real> {
    mean(view.input_c().iter().copied()).ok_or(MetricError::EmptyChannel { channel: "input" })
}

/// Mean reservoir temperature; `ChannelAbsent` when the run has no
/// reservoir channel.
pub fn reservoir_mean(view: &SeriesView<'_>) -> MetricResult<Real> {
    let reservoir = view.reservoir_c().ok_or(MetricError::ChannelAbsent {
        channel: "reservoir",
    })?;
    mean(reservoir.iter().copied()).ok_or(MetricError::EmptyChannel {
        channel: "reservoir",
    })
}

pub fn peak_output(view: &SeriesView<'_>) -> MetricResult<Real> {
    max(view.output_c().iter().copied()).ok_or(MetricError::EmptyChannel { channel: "output" })
}
