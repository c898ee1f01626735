use foundation::time::{Time, TimeSpan};

/// Focus transition length (seconds).
const FOCUS_ANIM_S: f64 = 0.35;

fn ease_out_cubic(t: f64) -> f64 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

/// The eased blend between a tile's projected placement and the centered
/// overlay presentation.
///
/// Runs forward on focus and backward on dismissal. `blend` is 0 at normal
/// projection, 1 fully centered; the overlay alpha follows it. An opening
/// transition that has finished simply holds at 1 while the tile stays
/// focused; a finished closing transition is dropped by the viewer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FocusTransition {
    tile: usize,
    span: TimeSpan,
    closing: bool,
}

impl FocusTransition {
    pub fn opening(tile: usize, now: Time) -> Self {
        Self {
            tile,
            span: TimeSpan::from_start(now, FOCUS_ANIM_S),
            closing: false,
        }
    }

    pub fn closing(tile: usize, now: Time) -> Self {
        Self {
            tile,
            span: TimeSpan::from_start(now, FOCUS_ANIM_S),
            closing: true,
        }
    }

    pub fn tile(&self) -> usize {
        self.tile
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Eased blend toward the centered presentation at `now`.
    pub fn blend(&self, now: Time) -> f64 {
        let eased = ease_out_cubic(self.span.progress_at(now));
        if self.closing { 1.0 - eased } else { eased }
    }

    /// True once the underlying span has fully elapsed.
    pub fn finished(&self, now: Time) -> bool {
        self.span.progress_at(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::FocusTransition;
    use foundation::time::Time;

    #[test]
    fn opening_rises_from_zero_to_one() {
        let tr = FocusTransition::opening(3, Time(1.0));
        assert_eq!(tr.tile(), 3);
        assert_eq!(tr.blend(Time(1.0)), 0.0);
        let mid = tr.blend(Time(1.175));
        assert!(mid > 0.5 && mid < 1.0, "ease-out midpoint was {mid}");
        assert_eq!(tr.blend(Time(2.0)), 1.0);
        assert!(tr.finished(Time(1.35)));
        assert!(!tr.finished(Time(1.2)));
    }

    #[test]
    fn closing_is_the_reverse_of_opening() {
        let open = FocusTransition::opening(0, Time(0.0));
        let close = FocusTransition::closing(0, Time(0.0));
        for t in [0.0, 0.1, 0.2, 0.35, 1.0] {
            let a = open.blend(Time(t));
            let b = close.blend(Time(t));
            assert!((a + b - 1.0).abs() < 1e-12);
        }
        assert_eq!(close.blend(Time(10.0)), 0.0);
    }

    #[test]
    fn blend_is_monotone_while_opening() {
        let tr = FocusTransition::opening(1, Time(0.0));
        let mut prev = -1.0;
        for i in 0..=20 {
            let b = tr.blend(Time(i as f64 * 0.35 / 20.0));
            assert!(b >= prev);
            prev = b;
        }
    }
}
