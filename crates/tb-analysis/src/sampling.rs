//! Sampling-interval inference.
//!
//! Debounce lengths are expressed in samples, using the interval between
//! the first two samples of a view. Recordings are assumed uniformly
//! sampled; [`inspect`] measures how far a view departs from that.

use tb_core::Real;
use tb_series::SeriesView;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SamplingReport {
    /// Interval between the first two samples, if there are two
    pub interval_s: Option<Real>,
    /// Steps deviating from `interval_s` by more than the tolerance
    pub irregular_steps: usize,
    /// Largest relative deviation of any step from `interval_s`
    pub max_deviation_rel: Real,
}

impl SamplingReport {
    pub fn is_uniform(&self) -> bool {
        self.irregular_steps == 0
    }
}

/// Interval between the first two samples of the view.
pub fn inferred_interval(view: &SeriesView<'_>) -> Option<Real> {
    let mut elapsed = view.elapsed_s();
    let first = elapsed.next()?;
    let second = elapsed.next()?;
    Some(second - first)
}

/// Number of consecutive samples spanning `duration_s` at `interval_s`.
///
/// `interval_s` must be positive. A small slack keeps exact ratios such as
/// 10 s / 0.1 s from rounding up an extra sample.
pub fn samples_for(duration_s: Real, interval_s: Real) -> usize {
    let ratio = duration_s / interval_s;
    ((ratio - 1e-9).ceil() as usize).max(1)
}

pub fn inspect(view: &SeriesView<'_>, tolerance_rel: Real) -> SamplingReport {
    let Some(interval_s) = inferred_interval(view) else {
        return SamplingReport::default();
    };
    let mut report = SamplingReport {
        interval_s: Some(interval_s),
        ..Default::default()
    };
    if interval_s <= 0.0 {
        return report;
    }

    let elapsed: Vec<Real> = view.elapsed_s().collect();
    for step in elapsed.windows(2).map(|w| w[1] - w[0]) {
        let deviation = (step - interval_s).abs() / interval_s;
        report.max_deviation_rel = report.max_deviation_rel.max(deviation);
        if deviation > tolerance_rel {
            report.irregular_steps += 1;
        }
    }
    report
}
