//! Outcome types for detection and aggregation.
//!
//! Event errors are valid terminal states of a run, not faults; callers
//! turn them into sentinels in the summary record.

use thiserror::Error;

pub type EventResult<T> = Result<T, EventError>;
pub type MetricResult<T> = Result<T, MetricError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("Output never reached {threshold_c} °C")]
    ThresholdNeverReached { threshold_c: f64 },

    #[error("Output never stayed below {threshold_c} °C for {debounce_s} s; delivery continued through the recording")]
    SustainedDeliveryIndeterminate { threshold_c: f64, debounce_s: f64 },

    #[error("Output never fell to {threshold_c} °C after {search_start_s} s; battery outlasted the recording")]
    BatteryNotDepleted {
        threshold_c: f64,
        search_start_s: f64,
    },

    #[error("Cannot infer sampling interval (first step {interval_s} s)")]
    InvalidSampleInterval { interval_s: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    #[error("No samples in window [{start_s} s, {end_s} s]")]
    EmptyWindow { start_s: f64, end_s: f64 },

    #[error("No samples for {channel}")]
    EmptyChannel { channel: &'static str },

    #[error("Run has no {channel} channel")]
    ChannelAbsent { channel: &'static str },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    #[error("Invalid policy value: {field} = {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}
