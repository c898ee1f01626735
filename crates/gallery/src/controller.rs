use std::collections::VecDeque;

use foundation::math::Vec2;
use scene::ViewOrientation;
use tracing::debug;

/// Samples kept for release-velocity estimation.
const VELOCITY_HISTORY_SIZE: usize = 5;

/// Angular speed below which inertia stops (radians/second).
const STOP_EPSILON: f64 = 5e-4;

/// Maximum pointer travel for a press to count as a tap (pixels).
const TAP_SLOP_PX: f64 = 8.0;

/// Maximum press duration for a tap (seconds).
const TAP_MAX_S: f64 = 0.25;

/// Per-event pointer step cap (pixels). A pointer that left the viewport and
/// re-entered far away moves the sphere by at most this much.
const MAX_DRAG_STEP_PX: f64 = 256.0;

/// Frame delta cap (seconds); a stalled host must not turn into a teleport.
const MAX_DT_S: f64 = 0.1;

/// Controller phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
    Releasing,
    Focused,
}

/// What a pointer press did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PressOutcome {
    StartedDrag,
    /// The press landed while a tile was focused: focus is dismissed and the
    /// press consumed. It does not begin a drag.
    DismissedFocus,
    Ignored,
}

/// What a pointer release did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// Near-zero movement within the tap window; the caller resolves the
    /// press position against the projected tiles.
    Tap { at: Vec2 },
    /// Entered inertial decay with the estimated release velocity.
    Coasting,
    /// Released without meaningful velocity; straight back to idle.
    Settled,
    Ignored,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct VelocitySample {
    d_yaw: f64,
    d_pitch: f64,
    dt: f64,
}

/// Drag/inertia state machine over single-pointer input.
///
/// `Idle -> Dragging -> Releasing -> Idle`, with `Idle <-> Focused` on tap
/// and dismissal. The controller owns the [`ViewOrientation`] exclusively;
/// everything else reads it through [`DragController::view`].
///
/// Timestamps are caller-supplied seconds from any monotonic origin. The
/// controller never reads a clock, so identical event sequences always
/// produce identical state.
#[derive(Debug, Clone)]
pub struct DragController {
    view: ViewOrientation,
    phase: DragPhase,
    radius: f64,
    pitch_limit: f64,
    dampening: f64,
    press_origin: Vec2,
    press_time: f64,
    travel_px: f64,
    last_pos: Vec2,
    last_time: f64,
    history: VecDeque<VelocitySample>,
}

impl DragController {
    pub fn new(radius: f64, pitch_limit: f64, dampening: f64) -> Self {
        Self {
            view: ViewOrientation::at_rest(),
            phase: DragPhase::Idle,
            radius: radius.max(1.0),
            pitch_limit: pitch_limit.max(0.0),
            dampening: dampening.max(0.0),
            press_origin: Vec2::new(0.0, 0.0),
            press_time: 0.0,
            travel_px: 0.0,
            last_pos: Vec2::new(0.0, 0.0),
            last_time: 0.0,
            history: VecDeque::with_capacity(VELOCITY_HISTORY_SIZE),
        }
    }

    pub fn view(&self) -> &ViewOrientation {
        &self.view
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Drag sensitivity follows the sphere: bigger radius, smaller angle per
    /// pixel, so rotation feels uniform at any size.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.max(1.0);
    }

    /// Updates the pitch bound and re-clamps the current pitch into it.
    pub fn set_pitch_limit(&mut self, pitch_limit: f64) {
        self.pitch_limit = pitch_limit.max(0.0);
        self.view.apply_delta(0.0, 0.0, self.pitch_limit);
    }

    pub fn set_dampening(&mut self, dampening: f64) {
        self.dampening = dampening.max(0.0);
    }

    /// Pointer press. Cancels any inertia outright: a re-drag during decay
    /// must not inherit residual velocity.
    pub fn pointer_down(&mut self, pos: Vec2, time_s: f64) -> PressOutcome {
        if self.phase == DragPhase::Focused {
            self.clear_focus();
            debug!("focus dismissed by press");
            return PressOutcome::DismissedFocus;
        }

        self.view.halt();
        self.history.clear();

        self.phase = DragPhase::Dragging;
        self.press_origin = pos;
        self.press_time = time_s;
        self.travel_px = 0.0;
        self.last_pos = pos;
        self.last_time = time_s;
        debug!(x = pos.x, y = pos.y, "drag started");
        PressOutcome::StartedDrag
    }

    /// Pointer move. Applies the angular delta 1:1 (no smoothing while the
    /// pointer is down) and records a velocity sample for release.
    pub fn pointer_move(&mut self, pos: Vec2, time_s: f64) {
        if self.phase != DragPhase::Dragging {
            return;
        }

        let raw = pos - self.last_pos;
        let dx = raw.x.clamp(-MAX_DRAG_STEP_PX, MAX_DRAG_STEP_PX);
        let dy = raw.y.clamp(-MAX_DRAG_STEP_PX, MAX_DRAG_STEP_PX);
        let dt = (time_s - self.last_time).max(1e-6);

        let d_yaw = dx / self.radius;
        let d_pitch = dy / self.radius;
        self.view.apply_delta(d_yaw, d_pitch, self.pitch_limit);

        self.history.push_back(VelocitySample { d_yaw, d_pitch, dt });
        if self.history.len() > VELOCITY_HISTORY_SIZE {
            self.history.pop_front();
        }

        self.travel_px += Vec2::new(dx, dy).length();
        self.last_pos = pos;
        self.last_time = time_s;
    }

    /// Pointer release: classifies the press as a tap or hands the estimated
    /// velocity to inertial decay.
    pub fn pointer_up(&mut self, time_s: f64) -> ReleaseOutcome {
        if self.phase != DragPhase::Dragging {
            return ReleaseOutcome::Ignored;
        }

        let duration = time_s - self.press_time;
        if self.travel_px <= TAP_SLOP_PX && duration <= TAP_MAX_S {
            self.phase = DragPhase::Idle;
            self.history.clear();
            debug!(duration, "press classified as tap");
            return ReleaseOutcome::Tap {
                at: self.press_origin,
            };
        }

        let (yaw_velocity, pitch_velocity) = self.estimate_release_velocity();
        self.history.clear();
        self.view.yaw_velocity = yaw_velocity;
        self.view.pitch_velocity = pitch_velocity;

        if self.view.angular_speed() > STOP_EPSILON {
            self.phase = DragPhase::Releasing;
            debug!(yaw_velocity, pitch_velocity, "drag released, coasting");
            ReleaseOutcome::Coasting
        } else {
            self.view.halt();
            self.phase = DragPhase::Idle;
            ReleaseOutcome::Settled
        }
    }

    /// Marks `tile` focused. Velocities are zeroed: the overlay presentation
    /// never drifts.
    pub fn focus_tile(&mut self, tile: usize) {
        self.view.halt();
        self.view.focused_tile = Some(tile);
        self.phase = DragPhase::Focused;
        debug!(tile, "tile focused");
    }

    /// Overlay dismissal (click-outside or escape equivalent).
    pub fn dismiss(&mut self) -> bool {
        if self.phase != DragPhase::Focused {
            return false;
        }
        self.clear_focus();
        debug!("focus dismissed");
        true
    }

    /// Per-frame inertial decay. Returns `true` while still coasting.
    ///
    /// Velocity decays multiplicatively by `exp(-dampening * dt)`, so the
    /// magnitude is monotonically non-increasing; once both components fall
    /// below epsilon the controller re-enters `Idle` and stops asking for
    /// frames.
    pub fn update(&mut self, dt_s: f64) -> bool {
        if self.phase != DragPhase::Releasing {
            return false;
        }

        let dt = dt_s.clamp(0.0, MAX_DT_S);
        self.view.apply_delta(
            self.view.yaw_velocity * dt,
            self.view.pitch_velocity * dt,
            self.pitch_limit,
        );

        let decay = (-self.dampening * dt).exp();
        self.view.yaw_velocity *= decay;
        self.view.pitch_velocity *= decay;

        if self.view.angular_speed() < STOP_EPSILON {
            self.view.halt();
            self.phase = DragPhase::Idle;
            debug!("inertia settled");
            return false;
        }
        true
    }

    fn clear_focus(&mut self) {
        self.view.focused_tile = None;
        self.view.halt();
        self.phase = DragPhase::Idle;
    }

    /// Mean angular rate over the recent samples, radians/second.
    fn estimate_release_velocity(&self) -> (f64, f64) {
        let mut d_yaw = 0.0;
        let mut d_pitch = 0.0;
        let mut total_dt = 0.0;
        for sample in &self.history {
            d_yaw += sample.d_yaw;
            d_pitch += sample.d_pitch;
            total_dt += sample.dt;
        }
        if total_dt <= 0.0 {
            return (0.0, 0.0);
        }
        (d_yaw / total_dt, d_pitch / total_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::{DragController, DragPhase, PressOutcome, ReleaseOutcome};
    use foundation::math::Vec2;

    const RADIUS: f64 = 600.0;

    fn controller() -> DragController {
        DragController::new(RADIUS, 0.3, 2.0)
    }

    /// A horizontal swipe fast enough to coast afterwards.
    fn swipe(ctl: &mut DragController) -> ReleaseOutcome {
        ctl.pointer_down(Vec2::new(100.0, 300.0), 0.0);
        for i in 1..=6 {
            let t = i as f64 * 0.016;
            ctl.pointer_move(Vec2::new(100.0 + 30.0 * i as f64, 300.0), t);
        }
        ctl.pointer_up(0.1)
    }

    #[test]
    fn drag_tracks_one_to_one() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(0.0, 0.0), 0.0);
        ctl.pointer_move(Vec2::new(60.0, -30.0), 0.016);
        assert_eq!(ctl.phase(), DragPhase::Dragging);
        assert!((ctl.view().yaw - 60.0 / RADIUS).abs() < 1e-12);
        assert!((ctl.view().pitch - (-30.0 / RADIUS)).abs() < 1e-12);
    }

    #[test]
    fn pitch_never_exceeds_the_bound() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(0.0, 0.0), 0.0);
        for i in 1..200 {
            let y = if i % 3 == 0 { -900.0 } else { 500.0 };
            ctl.pointer_move(Vec2::new(i as f64, y * i as f64), i as f64 * 0.016);
            assert!(ctl.view().pitch.abs() <= 0.3 + 1e-12);
        }
    }

    #[test]
    fn zero_pitch_limit_locks_vertical_tilt() {
        let mut ctl = DragController::new(RADIUS, 0.0, 2.0);
        ctl.pointer_down(Vec2::new(0.0, 0.0), 0.0);
        ctl.pointer_move(Vec2::new(0.0, 400.0), 0.016);
        assert_eq!(ctl.view().pitch, 0.0);
    }

    #[test]
    fn fast_release_coasts_and_decays_to_rest() {
        let mut ctl = controller();
        assert_eq!(swipe(&mut ctl), ReleaseOutcome::Coasting);
        assert_eq!(ctl.phase(), DragPhase::Releasing);

        let mut last_speed = ctl.view().angular_speed();
        assert!(last_speed > 0.0);
        let mut frames = 0;
        while ctl.update(1.0 / 60.0) {
            let speed = ctl.view().angular_speed();
            assert!(speed <= last_speed, "speed must not increase during decay");
            last_speed = speed;
            frames += 1;
            assert!(frames < 10_000, "decay must settle in bounded frames");
        }
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert_eq!(ctl.view().angular_speed(), 0.0);
    }

    #[test]
    fn zero_dampening_coasts_without_decay() {
        let mut ctl = DragController::new(RADIUS, 0.3, 0.0);
        swipe(&mut ctl);
        let v0 = ctl.view().yaw_velocity;
        for _ in 0..100 {
            assert!(ctl.update(1.0 / 60.0));
        }
        assert!((ctl.view().yaw_velocity - v0).abs() < 1e-12);
        assert_eq!(ctl.phase(), DragPhase::Releasing);
    }

    #[test]
    fn quick_still_press_is_a_tap() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(420.0, 280.0), 1.0);
        let outcome = ctl.pointer_up(1.05);
        assert_eq!(
            outcome,
            ReleaseOutcome::Tap {
                at: Vec2::new(420.0, 280.0)
            }
        );
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn long_press_is_not_a_tap() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(420.0, 280.0), 1.0);
        assert_eq!(ctl.pointer_up(1.6), ReleaseOutcome::Settled);
    }

    #[test]
    fn wiggle_back_to_origin_is_not_a_tap() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(100.0, 100.0), 0.0);
        ctl.pointer_move(Vec2::new(120.0, 100.0), 0.02);
        ctl.pointer_move(Vec2::new(100.0, 100.0), 0.04);
        // Travel is accumulated, not net displacement.
        let outcome = ctl.pointer_up(0.06);
        assert_ne!(
            outcome,
            ReleaseOutcome::Tap {
                at: Vec2::new(100.0, 100.0)
            }
        );
    }

    #[test]
    fn redrag_during_decay_starts_clean() {
        let mut ctl = controller();
        swipe(&mut ctl);
        assert_eq!(ctl.phase(), DragPhase::Releasing);

        // Press mid-coast: velocity must vanish, not bleed into the new drag.
        assert_eq!(
            ctl.pointer_down(Vec2::new(50.0, 50.0), 2.0),
            PressOutcome::StartedDrag
        );
        assert_eq!(ctl.view().angular_speed(), 0.0);

        // A glacial drag then releases with no meaningful velocity.
        ctl.pointer_move(Vec2::new(50.1, 50.0), 3.0);
        ctl.pointer_move(Vec2::new(50.2, 50.0), 4.0);
        ctl.pointer_move(Vec2::new(50.3, 50.0), 5.0);
        assert_eq!(ctl.pointer_up(6.0), ReleaseOutcome::Settled);
    }

    #[test]
    fn press_while_focused_dismisses_without_dragging() {
        let mut ctl = controller();
        ctl.focus_tile(2);
        assert_eq!(ctl.phase(), DragPhase::Focused);
        assert_eq!(ctl.view().focused_tile, Some(2));

        let outcome = ctl.pointer_down(Vec2::new(10.0, 10.0), 0.0);
        assert_eq!(outcome, PressOutcome::DismissedFocus);
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert_eq!(ctl.view().focused_tile, None);

        // The consumed press did not anchor a drag.
        ctl.pointer_move(Vec2::new(500.0, 10.0), 0.1);
        assert_eq!(ctl.view().yaw, 0.0);
    }

    #[test]
    fn dismiss_only_acts_when_focused() {
        let mut ctl = controller();
        assert!(!ctl.dismiss());
        ctl.focus_tile(1);
        assert!(ctl.dismiss());
        assert_eq!(ctl.view().focused_tile, None);
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn stray_events_are_ignored() {
        let mut ctl = controller();
        // Move without a press.
        ctl.pointer_move(Vec2::new(300.0, 300.0), 0.5);
        assert_eq!(ctl.view().yaw, 0.0);
        // Release without a press.
        assert_eq!(ctl.pointer_up(0.6), ReleaseOutcome::Ignored);
        // Update while idle.
        assert!(!ctl.update(0.016));
    }

    #[test]
    fn pointer_jumps_are_clamped() {
        let mut ctl = controller();
        ctl.pointer_down(Vec2::new(0.0, 0.0), 0.0);
        ctl.pointer_move(Vec2::new(5000.0, 0.0), 0.016);
        assert!((ctl.view().yaw - 256.0 / RADIUS).abs() < 1e-12);
    }

    #[test]
    fn stalled_frames_cap_the_applied_delta() {
        let mut ctl = controller();
        swipe(&mut ctl);
        let yaw_before = ctl.view().yaw;
        let speed = ctl.view().yaw_velocity;
        ctl.update(10.0);
        let applied = ctl.view().yaw - yaw_before;
        assert!(applied.abs() <= (speed * 0.1).abs() + 1e-9);
    }
}
