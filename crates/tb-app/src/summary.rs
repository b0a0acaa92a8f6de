//! Single-run reduction and edge-case policy.
//!
//! A run that never reaches the operating threshold is cold: event
//! detection is skipped and battery time, delivery time and infused volume
//! are zero, with startup not applicable. A hot run gets battery, startup
//! and delivery-end detection; outcomes where the event never happened are
//! carried as `NotObserved` rather than as numbers.

use tb_analysis::{
    EventError, MetricError, ReductionPolicy, SamplingReport, battery_duration, input_mean,
    peak_output, reservoir_mean, sampling, startup_time, steady_state_mean,
    sustained_delivery_end, trim_to_operational,
};
use tb_core::{Reading, Real, as_ml, delivered_volume, ml_per_min, round_to, s};
use tb_label::RunParameters;
use tb_results::SummaryRecord;
use tb_series::TimeSeries;

use crate::error::RunResult;

/// A reduced run plus what was learned along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedRun {
    pub record: SummaryRecord,
    /// Whether the output ever reached the operating threshold
    pub reached_operating_temp: bool,
    /// Sampling of the operational part of the run (hot runs only)
    pub sampling: Option<SamplingReport>,
    /// Terminal outcomes reported as sentinels in the record
    pub outcomes: Vec<EventError>,
}

struct Events {
    startup_s: Reading<Real>,
    delivery_s: Reading<Real>,
    battery_s: Reading<Real>,
    sampling: Option<SamplingReport>,
    outcomes: Vec<EventError>,
}

/// Reduce one normalized run into its summary record.
pub fn reduce_run(
    params: &RunParameters,
    label: &str,
    series: &TimeSeries,
    policy: &ReductionPolicy,
) -> RunResult<ReducedRun> {
    let view = series.view();
    let decimals = policy.decimals;

    let input_mean_c = round_to(input_mean(&view)?, decimals);
    let peak_c = peak_output(&view)?;

    let steady_state_mean_c = match steady_state_mean(&view, policy) {
        Ok(m) => Reading::Value(round_to(m, decimals)),
        Err(err) => {
            tracing::warn!(label, %err, "steady-state mean not applicable");
            Reading::NotApplicable
        }
    };
    let reservoir_mean_c = match reservoir_mean(&view) {
        Ok(m) => Reading::Value(round_to(m, decimals)),
        Err(MetricError::ChannelAbsent { .. }) => Reading::NotApplicable,
        Err(err) => return Err(err.into()),
    };

    let reached_operating_temp = peak_c >= policy.operating_temp_c;
    let events = if reached_operating_temp {
        detect_events(label, series, policy)
    } else {
        tracing::debug!(label, peak_c, "run never reached operating temperature");
        Events {
            startup_s: Reading::NotApplicable,
            delivery_s: Reading::Value(0.0),
            battery_s: Reading::Value(0.0),
            sampling: None,
            outcomes: Vec::new(),
        }
    };

    // Delivered volume and the cross-check use whole seconds of delivery.
    let delivery_whole_s = events.delivery_s.map(Real::floor);
    let fluid_infused_ml = delivery_whole_s.map(|secs| {
        let volume = delivered_volume(ml_per_min(params.flow_rate_ml_min as Real), s(secs));
        round_to(as_ml(volume), decimals)
    });
    let cross_check = steady_state_mean_c
        .zip(delivery_whole_s)
        .map(|(steady, secs)| {
            let litres = secs / 60.0 * params.flow_rate_ml_min as Real / 1000.0;
            round_to((steady - input_mean_c) * litres, decimals)
        });

    let record = SummaryRecord {
        date: series.date(),
        unit_id: params.unit_id.clone(),
        battery_id: params.battery_id.clone(),
        disposable_id: params.disposable_id.clone(),
        trial_id: params.trial_id.clone(),
        target_temp_c: params.target_temp_c,
        flow_rate_ml_min: params.flow_rate_ml_min,
        input_mean_c,
        steady_state_mean_c,
        reservoir_mean_c,
        startup_s: events.startup_s,
        peak_c,
        sustained_delivery_s: events.delivery_s,
        fluid_infused_ml,
        battery_s: events.battery_s,
        cross_check,
        source_label: label.to_string(),
        comment: String::new(),
    };

    Ok(ReducedRun {
        record,
        reached_operating_temp,
        sampling: events.sampling,
        outcomes: events.outcomes,
    })
}

/// Battery, startup and delivery-end detection for a hot run. Battery and
/// delivery end are independent of each other.
fn detect_events(label: &str, series: &TimeSeries, policy: &ReductionPolicy) -> Events {
    let view = series.view();
    let mut outcomes = Vec::new();

    let battery_s = match battery_duration(&view, policy) {
        Ok(t) => Reading::Value(t),
        Err(err) => {
            tracing::debug!(label, %err, "battery not depleted");
            outcomes.push(err);
            Reading::NotObserved
        }
    };

    let startup = match startup_time(&view, policy) {
        Ok(t) => t,
        Err(err) => {
            outcomes.push(err);
            return Events {
                startup_s: Reading::NotApplicable,
                delivery_s: Reading::NotObserved,
                battery_s,
                sampling: None,
                outcomes,
            };
        }
    };

    let operational = trim_to_operational(&view, startup);
    let report = sampling::inspect(&operational, policy.sampling_tolerance_rel);
    if !report.is_uniform() {
        tracing::warn!(
            label,
            irregular_steps = report.irregular_steps,
            max_deviation_rel = report.max_deviation_rel,
            "irregular sampling; debounce assumes the first interval"
        );
    }

    let delivery_s = match sustained_delivery_end(&operational, policy) {
        Ok(t) => Reading::Value(t),
        Err(err) => {
            tracing::debug!(label, %err, "sustained delivery end not observed");
            outcomes.push(err);
            Reading::NotObserved
        }
    };

    Events {
        startup_s: Reading::Value(startup),
        delivery_s,
        battery_s,
        sampling: Some(report),
        outcomes,
    }
}
