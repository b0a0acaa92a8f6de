//! Threshold-crossing events inside a run.

use tb_core::Real;
use tb_series::SeriesView;

use crate::sampling::{inferred_interval, samples_for};
use crate::{EventError, EventResult, ReductionPolicy};

/// Elapsed time of the first sample at or above the operating threshold.
pub fn startup_time(view: &SeriesView<'_>, policy: &ReductionPolicy) -> EventResult<Real> {
    view.iter()
        .find(|s| s.output_c >= policy.operating_temp_c)
        .map(|s| s.elapsed_s)
        .ok_or(EventError::ThresholdNeverReached {
            threshold_c: policy.operating_temp_c,
        })
}

/// Samples from `startup_s` on, with elapsed time re-based to zero there.
pub fn trim_to_operational<'a>(view: &SeriesView<'a>, startup_s: Real) -> SeriesView<'a> {
    view.since(startup_s).rebased()
}

/// Elapsed time (in the operational view's time base) at which output
/// dropped below the operating threshold and stayed there for the debounce
/// period.
///
/// The debounce length in samples comes from the first sampling step. When
/// the below-threshold streak reaches that length at sample `i`, the result
/// is the elapsed time of sample `i - debounce_samples`.
pub fn sustained_delivery_end(
    operational: &SeriesView<'_>,
    policy: &ReductionPolicy,
) -> EventResult<Real> {
    let indeterminate = EventError::SustainedDeliveryIndeterminate {
        threshold_c: policy.operating_temp_c,
        debounce_s: policy.debounce_s,
    };
    let Some(interval_s) = inferred_interval(operational) else {
        return Err(indeterminate);
    };
    if interval_s <= 0.0 {
        return Err(EventError::InvalidSampleInterval { interval_s });
    }
    let debounce_samples = samples_for(policy.debounce_s, interval_s);

    let mut below = 0usize;
    for (i, output) in operational.output_c().iter().enumerate() {
        if *output < policy.operating_temp_c {
            below += 1;
            if below >= debounce_samples {
                let start = i.saturating_sub(debounce_samples);
                let end_s = operational
                    .get(start)
                    .map(|s| s.elapsed_s)
                    .ok_or(EventError::InvalidSampleInterval { interval_s })?;
                tracing::debug!(
                    interval_s,
                    debounce_samples,
                    end_s,
                    "sustained delivery ended"
                );
                return Ok(end_s);
            }
        } else {
            below = 0;
        }
    }
    Err(indeterminate)
}

/// Elapsed time of the first sample at or after the battery search start
/// whose output is at or below the depletion threshold.
pub fn battery_duration(view: &SeriesView<'_>, policy: &ReductionPolicy) -> EventResult<Real> {
    view.since(policy.battery_search_start_s)
        .iter()
        .find(|s| s.output_c <= policy.depletion_temp_c)
        .map(|s| s.elapsed_s)
        .ok_or(EventError::BatteryNotDepleted {
            threshold_c: policy.depletion_temp_c,
            search_start_s: policy.battery_search_start_s,
        })
}
