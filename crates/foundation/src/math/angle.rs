//! Angle helpers.
//!
//! Engine math is radians-first; degrees appear only at the configuration
//! boundary and are converted on the way in.

use std::f64::consts::{PI, TAU};

pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Wraps an angle into `[-PI, PI)`.
///
/// Used to keep an unbounded yaw from accumulating float error over long
/// drag sessions; a full turn maps back onto itself.
pub fn wrap_angle(rad: f64) -> f64 {
    let wrapped = rad.rem_euclid(TAU);
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Clamps `v` to `[-limit, +limit]`. `limit` must be non-negative.
pub fn clamp_abs(v: f64, limit: f64) -> f64 {
    v.clamp(-limit, limit)
}
