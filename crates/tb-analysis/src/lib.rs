//! Event detection and windowed metrics over a normalized run.
//!
//! # Architecture
//!
//! - [`events`]: threshold crossings with debounce (startup, sustained
//!   delivery end, battery depletion)
//! - [`metrics`]: means and peak over the whole run or a fixed window
//! - [`sampling`]: sampling-interval inference and irregularity checks
//! - [`policy`]: thresholds and windows, defaulting to the bench constants
//!
//! All functions are pure: they take a [`tb_series::SeriesView`] and a
//! [`ReductionPolicy`] and return a value or a typed outcome error.

pub mod error;
pub mod events;
pub mod metrics;
pub mod policy;
pub mod sampling;

pub use error::{EventError, EventResult, MetricError, MetricResult, PolicyError};
pub use events::{battery_duration, startup_time, sustained_delivery_end, trim_to_operational};
pub use metrics::{input_mean, peak_output, reservoir_mean, steady_state_mean};
pub use policy::ReductionPolicy;
pub use sampling::SamplingReport;
