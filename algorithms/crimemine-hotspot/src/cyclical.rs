//! Cyclical encoding of periodic quantities
//!
//! Hour-of-day and day-of-week wrap around: 23:00 is one hour from 00:00, not 23. Mapping a value
//! `v` of period `T` to the point `(sin θ, cos θ)` with `θ = 2π·v/T` keeps that neighbourhood
//! intact under the Euclidean distance used by K-Means.
use std::f64::consts::TAU;

/// Period of the hour-of-day feature
pub const HOURS_PER_DAY: f64 = 24.0;
/// Period of the day-of-week feature (Monday = 0)
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Returns `(sin θ, cos θ)` for `θ = 2π·value/period`.
pub fn encode_cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = TAU * value / period;
    (angle.sin(), angle.cos())
}

/// Inverse of [`encode_cyclical`]
///
/// The angle is recovered with `atan2`, normalised to `[0, 2π)` and scaled back to the period,
/// so the result always lies in `[0, period)`. Centroids are means of encoded points and do not
/// lie on the unit circle, only their direction matters here.
pub fn decode_cyclical(sin: f64, cos: f64, period: f64) -> f64 {
    let mut angle = sin.atan2(cos);
    if angle < 0. {
        angle += TAU;
    }
    let value = angle / TAU * period;
    // rounding can land exactly on the period
    if value >= period {
        value - period
    } else {
        value
    }
}
