use std::f64::consts::TAU;

use foundation::bounds::Aabb2;
use foundation::math::{Vec2, stable_total_cmp_f64};

use crate::projection::TileTransform;

/// Fraction of the column pitch (ring circumference / segments) a tile face
/// occupies; the remainder is the gap between neighbours.
const TILE_FILL: f64 = 0.82;

/// Edge length in pixels of an unscaled tile for the given sphere.
pub fn tile_edge_px(radius: f64, segments: u32) -> f64 {
    if segments == 0 {
        return 0.0;
    }
    TILE_FILL * TAU * radius / f64::from(segments)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub tile: usize,
    pub depth: f64,
}

/// Screen-space hit test over projected transforms.
///
/// Ordering contract:
/// - The nearest (smallest depth) visible tile under the point wins.
/// - Exact depth ties break toward the lower tile index.
///
/// Culled tiles never hit; an empty transform list never hits.
pub fn pick_tile(transforms: &[TileTransform], point: Vec2, edge_px: f64) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;

    for t in transforms {
        if !t.visible {
            continue;
        }
        let half = t.scale * edge_px * 0.5;
        let rect = Aabb2::from_center_half_extent(t.screen, half);
        if !rect.contains(point) {
            continue;
        }

        let hit = PickHit {
            tile: t.tile,
            depth: t.depth,
        };
        best = match best {
            None => Some(hit),
            Some(b) => {
                let ord =
                    stable_total_cmp_f64(hit.depth, b.depth).then_with(|| hit.tile.cmp(&b.tile));
                if ord.is_lt() { Some(hit) } else { Some(b) }
            }
        };
    }

    best
}
