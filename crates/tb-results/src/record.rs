//! Fixed-shape per-run summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tb_core::{Reading, Real};
use tb_label::RunParameters;

/// Column titles of the output table, in record field order.
pub const TITLES: [&str; 18] = [
    "Date",
    "Unit",
    "Battery",
    "Disposable",
    "Trial",
    "Input Temp Target (°C)",
    "Flowrate (mL/min)",
    "Input Temp Mean (°C)",
    "Steady-State Output Temp (°C)",
    "Reservoir Temp Mean (°C)",
    "Startup Time",
    "Peak Temp (°C)",
    "Test Time > 36°C",
    "Fluid Infused (mL)",
    "Battery Time",
    "ΔT x Time x Flowrate",
    "Filename",
    "Comment",
];

/// One reduced run. Field order is the output table's column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub date: NaiveDate,
    pub unit_id: Option<String>,
    pub battery_id: String,
    pub disposable_id: Option<String>,
    pub trial_id: Option<String>,
    pub target_temp_c: i32,
    pub flow_rate_ml_min: u32,
    pub input_mean_c: Real,
    pub steady_state_mean_c: Reading<Real>,
    pub reservoir_mean_c: Reading<Real>,
    pub startup_s: Reading<Real>,
    pub peak_c: Real,
    pub sustained_delivery_s: Reading<Real>,
    pub fluid_infused_ml: Reading<Real>,
    pub battery_s: Reading<Real>,
    /// (steady mean - input mean) x delivered litres; informational only
    pub cross_check: Reading<Real>,
    pub source_label: String,
    pub comment: String,
}

impl SummaryRecord {
    /// Identifying fields as run parameters.
    pub fn parameters(&self) -> RunParameters {
        RunParameters {
            flow_rate_ml_min: self.flow_rate_ml_min,
            target_temp_c: self.target_temp_c,
            battery_id: self.battery_id.clone(),
            disposable_id: self.disposable_id.clone(),
            unit_id: self.unit_id.clone(),
            trial_id: self.trial_id.clone(),
        }
    }

    /// Cells in [`TITLES`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.date.format("%Y-%m-%d").to_string(),
            optional_id(&self.unit_id),
            self.battery_id.clone(),
            optional_id(&self.disposable_id),
            optional_id(&self.trial_id),
            self.target_temp_c.to_string(),
            self.flow_rate_ml_min.to_string(),
            self.input_mean_c.to_string(),
            self.steady_state_mean_c.to_string(),
            self.reservoir_mean_c.to_string(),
            self.startup_s.map(format_duration).to_string(),
            self.peak_c.to_string(),
            self.sustained_delivery_s.map(format_duration).to_string(),
            self.fluid_infused_ml.to_string(),
            self.battery_s.map(format_duration).to_string(),
            self.cross_check.to_string(),
            self.source_label.clone(),
            self.comment.clone(),
        ]
    }
}

fn optional_id(id: &Option<String>) -> String {
    id.clone().unwrap_or_else(|| "N/A".to_string())
}

/// `H:MM:SS`, with milliseconds only when the duration has a fraction.
pub fn format_duration(seconds: Real) -> String {
    let millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let (whole, frac) = (millis / 1000, millis % 1000);
    let (h, m, s) = (whole / 3600, (whole / 60) % 60, whole % 60);
    if frac == 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{h}:{m:02}:{s:02}.{frac:03}")
    }
}
