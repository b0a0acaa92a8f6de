// tb-core/src/units.rs

use uom::si::f64::{Time as UomTime, Volume as UomVolume, VolumeRate as UomVolumeRate};

// Public canonical unit types (SI, f64)
pub type Time = UomTime;
pub type Volume = UomVolume;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

/// Bench flow rates are quoted in mL/min.
#[inline]
pub fn ml_per_min(v: f64) -> VolumeRate {
    use uom::si::volume_rate::liter_per_minute;
    VolumeRate::new::<liter_per_minute>(v / 1000.0)
}

#[inline]
pub fn ml(v: f64) -> Volume {
    use uom::si::volume::milliliter;
    Volume::new::<milliliter>(v)
}

#[inline]
pub fn as_seconds(t: Time) -> f64 {
    use uom::si::time::second;
    t.get::<second>()
}

#[inline]
pub fn as_ml(v: Volume) -> f64 {
    use uom::si::volume::milliliter;
    v.get::<milliliter>()
}

/// Volume delivered at a constant rate over `duration`.
#[inline]
pub fn delivered_volume(rate: VolumeRate, duration: Time) -> Volume {
    rate * duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _dt = s(0.5);
        let _q = ml_per_min(92.0);
        let _v = ml(10.0);
    }

    #[test]
    fn minutes_convert_to_seconds() {
        assert!((as_seconds(minutes(5.0)) - 300.0).abs() < 1e-9);
        assert!((as_seconds(minutes(12.0)) - 720.0).abs() < 1e-9);
    }

    #[test]
    fn delivered_volume_matches_rate_times_minutes() {
        // 92 mL/min for 90 s = 138 mL
        let v = delivered_volume(ml_per_min(92.0), s(90.0));
        assert!((as_ml(v) - 138.0).abs() < 1e-9);
    }
}
