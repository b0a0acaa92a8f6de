//! Typed test parameters carried by a run label.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunParameters {
    /// Pump flow rate (mL/min)
    pub flow_rate_ml_min: u32,
    /// Target input temperature (°C), fractional labels truncated
    pub target_temp_c: i32,
    pub battery_id: String,
    /// `None` renders as "N/A"
    pub disposable_id: Option<String>,
    pub unit_id: Option<String>,
    pub trial_id: Option<String>,
}

impl RunParameters {
    pub fn new(flow_rate_ml_min: u32, target_temp_c: i32, battery_id: impl Into<String>) -> Self {
        Self {
            flow_rate_ml_min,
            target_temp_c,
            battery_id: battery_id.into(),
            disposable_id: None,
            unit_id: None,
            trial_id: None,
        }
    }

    pub fn with_disposable(mut self, id: impl Into<String>) -> Self {
        self.disposable_id = Some(id.into());
        self
    }

    pub fn with_unit(mut self, id: impl Into<String>) -> Self {
        self.unit_id = Some(id.into());
        self
    }

    pub fn with_trial(mut self, id: impl Into<String>) -> Self {
        self.trial_id = Some(id.into());
        self
    }
}

impl core::fmt::Display for RunParameters {
    /// Canonical verbose label (no extension). Absent ids are left out;
    /// the prefixes keep the rest in their slots.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}ml_m {}C batt{}",
            self.flow_rate_ml_min, self.target_temp_c, self.battery_id
        )?;
        let slots = [
            ("disp", &self.disposable_id),
            ("unit", &self.unit_id),
            ("trial", &self.trial_id),
        ];
        for (prefix, id) in slots {
            if let Some(id) = id {
                write!(f, " {prefix}{id}")?;
            }
        }
        Ok(())
    }
}
