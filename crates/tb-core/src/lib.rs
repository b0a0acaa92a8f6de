//! tb-core: shared foundation for thermobench.
//!
//! Contains:
//! - units (uom SI types + bench-friendly constructors)
//! - numeric (Real + tolerances + rounding/mean helpers)
//! - reading (value-or-sentinel outcome type used by every metric)

pub mod numeric;
pub mod reading;
pub mod units;

pub use numeric::*;
pub use reading::Reading;
pub use units::*;
