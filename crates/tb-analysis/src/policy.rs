//! Reduction thresholds and windows.

use serde::{Deserialize, Serialize};
use tb_core::{Real, as_seconds, minutes, s};

use crate::PolicyError;

/// Thresholds, windows and rounding used to reduce a run.
///
/// Defaults are the bench constants: 36 °C operating threshold with a 10 s
/// debounce, 30 °C depletion threshold searched from minute 5, and a
/// steady-state window of minutes 5 to 12.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReductionPolicy {
    pub operating_temp_c: Real,
    pub depletion_temp_c: Real,
    pub debounce_s: Real,
    pub battery_search_start_s: Real,
    pub steady_window_start_s: Real,
    pub steady_window_end_s: Real,
    /// Decimal places kept for reported means and the cross-check figure
    pub decimals: u32,
    /// Relative step deviation above which sampling counts as irregular
    pub sampling_tolerance_rel: Real,
}

impl Default for ReductionPolicy {
    fn default() -> Self {
        Self {
            operating_temp_c: 36.0,
            depletion_temp_c: 30.0,
            debounce_s: as_seconds(s(10.0)),
            battery_search_start_s: as_seconds(minutes(5.0)),
            steady_window_start_s: as_seconds(minutes(5.0)),
            steady_window_end_s: as_seconds(minutes(12.0)),
            decimals: 2,
            sampling_tolerance_rel: 0.05,
        }
    }
}

impl ReductionPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        let finite = [
            ("operating_temp_c", self.operating_temp_c),
            ("depletion_temp_c", self.depletion_temp_c),
            ("debounce_s", self.debounce_s),
            ("battery_search_start_s", self.battery_search_start_s),
            ("steady_window_start_s", self.steady_window_start_s),
            ("steady_window_end_s", self.steady_window_end_s),
            ("sampling_tolerance_rel", self.sampling_tolerance_rel),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, value, "must be finite"));
            }
        }
        if self.debounce_s <= 0.0 {
            return Err(invalid("debounce_s", self.debounce_s, "must be positive"));
        }
        if self.battery_search_start_s < 0.0 {
            return Err(invalid(
                "battery_search_start_s",
                self.battery_search_start_s,
                "must not be negative",
            ));
        }
        if self.steady_window_end_s < self.steady_window_start_s {
            return Err(invalid(
                "steady_window_end_s",
                self.steady_window_end_s,
                "must not precede steady_window_start_s",
            ));
        }
        if self.sampling_tolerance_rel < 0.0 {
            return Err(invalid(
                "sampling_tolerance_rel",
                self.sampling_tolerance_rel,
                "must not be negative",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> PolicyError {
    PolicyError::InvalidValue {
        field,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bench_constants() {
        let p = ReductionPolicy::default();
        assert_eq!(p.operating_temp_c, 36.0);
        assert_eq!(p.depletion_temp_c, 30.0);
        assert!((p.debounce_s - 10.0).abs() < 1e-9);
        assert!((p.steady_window_start_s - 300.0).abs() < 1e-9);
        assert!((p.steady_window_end_s - 720.0).abs() < 1e-9);
        assert!((p.battery_search_start_s - 300.0).abs() < 1e-9);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let p = ReductionPolicy {
            steady_window_start_s: 800.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(PolicyError::InvalidValue {
                field: "steady_window_end_s",
                ..
            })
        ));
    }

    #[test]
    fn zero_debounce_is_rejected() {
        let p = ReductionPolicy {
            debounce_s: 0.0,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }
}
