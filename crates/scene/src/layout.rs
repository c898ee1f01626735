use std::f64::consts::{FRAC_PI_4, PI, TAU};

use foundation::math::{stable_total_cmp_f64, wrap_angle};

use crate::tiles::SphereTile;

/// Latitude half-extent of the tile band (radians).
///
/// The poles stay empty: a dome gallery only ever presents a forward-leaning
/// band of the sphere, and pitch is clamped well inside this range.
pub const BAND_LIMIT: f64 = FRAC_PI_4;

/// Fractional part of the golden ratio conjugate; spreads the theta offset of
/// successive fill passes so no two passes ever land on the same column.
const PASS_OFFSET_SEQ: f64 = 0.618_033_988_749_895;

/// Rings in the band for a given grid density; 34 segments make 4 rings.
fn ring_count(segments: u32) -> usize {
    ((segments / 8) as usize).clamp(1, 9)
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Slot {
    theta: f64,
    phi: f64,
    theta_step: f64,
}

/// Candidate positions for one full pass over the band, in fill order:
/// rings from the equator outward (northern ring before its southern
/// mirror), columns from the front meridian outward.
fn slot_grid(segments: u32) -> Vec<Slot> {
    let rings = ring_count(segments);
    let lat_step = 2.0 * BAND_LIMIT / rings as f64;

    let mut lats: Vec<f64> = (0..rings)
        .map(|i| -BAND_LIMIT + (i as f64 + 0.5) * lat_step)
        .collect();
    lats.sort_by(|a, b| {
        stable_total_cmp_f64(a.abs(), b.abs()).then_with(|| stable_total_cmp_f64(*b, *a))
    });

    let mut slots = Vec::new();
    for phi in lats {
        let cols = ((segments as f64 * phi.cos()).round() as usize).max(1);
        let theta_step = TAU / cols as f64;
        let mut thetas: Vec<f64> = (0..cols)
            .map(|j| -PI + (j as f64 + 0.5) * theta_step)
            .collect();
        thetas.sort_by(|a, b| {
            stable_total_cmp_f64(a.abs(), b.abs()).then_with(|| stable_total_cmp_f64(*a, *b))
        });

        for theta in thetas {
            slots.push(Slot {
                theta,
                phi,
                theta_step,
            });
        }
    }
    slots
}

/// Places `tile_count` tiles on the sphere band for the given grid density.
///
/// Pure and deterministic: the same inputs always produce the same
/// coordinates, and no two tiles share a `(theta, phi)` pair. Fewer tiles
/// than slots take the most equator- and front-facing slots; more tiles than
/// slots wrap into additional passes whose columns are shifted by an
/// irrational fraction of the column step, so repeats can never collide.
///
/// `segments == 0` or `tile_count == 0` yields an empty layout.
pub fn layout_tiles(segments: u32, tile_count: usize) -> Vec<SphereTile> {
    if segments == 0 || tile_count == 0 {
        return Vec::new();
    }

    let slots = slot_grid(segments);
    let mut out = Vec::with_capacity(tile_count);
    let mut pass = 0u64;
    while out.len() < tile_count {
        let offset_frac = (pass as f64 * PASS_OFFSET_SEQ).fract();
        for slot in &slots {
            if out.len() == tile_count {
                break;
            }
            let theta = wrap_angle(slot.theta + slot.theta_step * offset_frac);
            out.push(SphereTile::new(out.len(), theta, slot.phi));
        }
        pass += 1;
    }
    out
}
