use foundation::math::{clamp_abs, wrap_angle};

/// Mutable per-mount view state.
///
/// Ownership contract: the drag controller is the only writer; projection and
/// rendering read it. Within a frame all writes land before the first read.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewOrientation {
    /// Horizontal rotation, radians, wrapped to `[-PI, PI)`.
    pub yaw: f64,
    /// Vertical tilt, radians, clamped to the configured bound.
    pub pitch: f64,
    /// Radians per second.
    pub yaw_velocity: f64,
    /// Radians per second.
    pub pitch_velocity: f64,
    /// Tile lifted into the focused overlay presentation, if any.
    pub focused_tile: Option<usize>,
}

impl ViewOrientation {
    pub fn at_rest() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            focused_tile: None,
        }
    }

    /// Applies an angular delta, wrapping yaw and clamping pitch to
    /// `±pitch_limit` radians.
    pub fn apply_delta(&mut self, d_yaw: f64, d_pitch: f64, pitch_limit: f64) {
        self.yaw = wrap_angle(self.yaw + d_yaw);
        self.pitch = clamp_abs(self.pitch + d_pitch, pitch_limit);
    }

    /// Zeroes both velocity components.
    pub fn halt(&mut self) {
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
    }

    /// The larger of the two angular speeds, for rest detection.
    pub fn angular_speed(&self) -> f64 {
        self.yaw_velocity.abs().max(self.pitch_velocity.abs())
    }
}

impl Default for ViewOrientation {
    fn default() -> Self {
        Self::at_rest()
    }
}

#[cfg(test)]
mod tests {
    use super::ViewOrientation;
    use std::f64::consts::PI;

    #[test]
    fn starts_at_rest() {
        let view = ViewOrientation::at_rest();
        assert_eq!(view.yaw, 0.0);
        assert_eq!(view.pitch, 0.0);
        assert_eq!(view.angular_speed(), 0.0);
        assert_eq!(view.focused_tile, None);
    }

    #[test]
    fn apply_delta_clamps_pitch() {
        let mut view = ViewOrientation::at_rest();
        let limit = 0.3;
        view.apply_delta(0.0, 1.0, limit);
        assert_eq!(view.pitch, limit);
        view.apply_delta(0.0, -5.0, limit);
        assert_eq!(view.pitch, -limit);
    }

    #[test]
    fn apply_delta_wraps_yaw() {
        let mut view = ViewOrientation::at_rest();
        view.apply_delta(3.0 * PI, 0.0, 0.0);
        assert!(view.yaw >= -PI && view.yaw < PI);
        assert!((view.yaw - (-PI)).abs() < 1e-12 || (view.yaw - PI).abs() < 1e-9);
    }

    #[test]
    fn halt_zeroes_velocities() {
        let mut view = ViewOrientation::at_rest();
        view.yaw_velocity = 2.0;
        view.pitch_velocity = -0.5;
        assert_eq!(view.angular_speed(), 2.0);
        view.halt();
        assert_eq!(view.angular_speed(), 0.0);
    }
}
