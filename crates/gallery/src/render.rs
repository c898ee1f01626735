use foundation::math::{Vec2, stable_total_cmp_f64};
use runtime::{Frame, Metrics};
use scene::{TileTransform, Viewport};

use crate::assets::{AssetState, TileAssets};
use crate::style::{GalleryStyle, Rgba};

/// Facing band over which a tile fades in as it rotates around the horizon.
const FADE_BAND: f64 = 0.15;

/// Fraction of the viewport's short side a fully focused tile occupies.
const FOCUS_EXTENT_FRAC: f64 = 0.6;

/// One tile's draw command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileDraw {
    pub tile: usize,
    /// Tile center in screen pixels.
    pub screen: Vec2,
    pub scale: f64,
    pub depth: f64,
    pub opacity: f64,
    /// `Failed` tiles keep their slot and transform; the host renders a
    /// placeholder instead of the image.
    pub asset: AssetState,
}

/// The dimming backdrop beneath a focused tile.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayDraw {
    pub color: Rgba,
    pub alpha: f64,
    pub tile: usize,
}

/// Output of one frame.
///
/// Paint order is explicit: `draws` back-to-front (painter's algorithm),
/// then `overlay`, then `focused` on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub frame_index: u64,
    pub draws: Vec<TileDraw>,
    pub style: GalleryStyle,
    pub overlay: Option<OverlayDraw>,
    pub focused: Option<TileDraw>,
}

impl RenderFrame {
    pub fn empty(frame_index: u64, style: GalleryStyle) -> Self {
        Self {
            frame_index,
            draws: Vec::new(),
            style,
            overlay: None,
            focused: None,
        }
    }
}

/// Assembles draw lists from projected transforms.
///
/// Depth ordering uses the deterministic float comparison with a tile-index
/// tie-break, so two identical frames always paint identically.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderPass {
    pub style: GalleryStyle,
    pub viewport: Viewport,
    pub tile_edge_px: f64,
    pub backface_limit: f64,
}

impl RenderPass {
    /// `focus` is the focused tile and its blend toward the centered
    /// presentation (0 = projected placement, 1 = fully centered).
    pub fn compose(
        &self,
        frame: Frame,
        transforms: &[TileTransform],
        focus: Option<(usize, f64)>,
        assets: &TileAssets,
        metrics: &mut Metrics,
    ) -> RenderFrame {
        let focused_tile = focus.map(|(tile, _)| tile);
        let mut draws = Vec::new();
        let mut culled = 0u64;

        for t in transforms {
            if Some(t.tile) == focused_tile {
                continue;
            }
            if !t.visible {
                culled += 1;
                continue;
            }
            draws.push(TileDraw {
                tile: t.tile,
                screen: t.screen,
                scale: t.scale,
                depth: t.depth,
                opacity: self.edge_opacity(t.facing),
                asset: assets.state(t.tile),
            });
        }

        // Painter's algorithm: farthest first, nearer tiles draw over them.
        draws.sort_by(|a, b| {
            stable_total_cmp_f64(b.depth, a.depth).then_with(|| a.tile.cmp(&b.tile))
        });

        let focused = focus.and_then(|(tile, blend)| {
            let t = transforms.iter().find(|t| t.tile == tile)?;
            Some(self.focused_draw(t, blend, assets.state(tile)))
        });

        let overlay = focus.and_then(|(tile, blend)| {
            if blend <= 0.0 {
                return None;
            }
            Some(OverlayDraw {
                color: self.style.overlay_color,
                alpha: blend,
                tile,
            })
        });

        metrics.inc_counter("tiles_projected", transforms.len() as u64);
        metrics.inc_counter("tiles_culled", culled);
        metrics.inc_counter(
            "tiles_drawn",
            draws.len() as u64 + u64::from(focused.is_some()),
        );
        metrics.set_gauge(
            "focused_tile",
            focused_tile.map(|t| t as i64).unwrap_or(-1),
        );

        RenderFrame {
            frame_index: frame.index,
            draws,
            style: self.style,
            overlay,
            focused,
        }
    }

    /// Tiles fade in over a narrow facing band past the cull threshold
    /// instead of popping at the horizon.
    fn edge_opacity(&self, facing: f64) -> f64 {
        ((facing - self.backface_limit) / FADE_BAND).clamp(0.0, 1.0)
    }

    /// Blends the projected placement toward the centered, enlarged,
    /// head-on presentation. The focused tile renders even if projection
    /// culled it: focus overrides the sphere.
    fn focused_draw(&self, t: &TileTransform, blend: f64, asset: AssetState) -> TileDraw {
        let center = self.viewport.center();
        let target_scale = if self.tile_edge_px > 0.0 {
            FOCUS_EXTENT_FRAC * self.viewport.min_extent() / self.tile_edge_px
        } else {
            t.scale
        };
        let base_opacity = if t.visible {
            self.edge_opacity(t.facing)
        } else {
            0.0
        };
        TileDraw {
            tile: t.tile,
            screen: Vec2::new(
                lerp(t.screen.x, center.x, blend),
                lerp(t.screen.y, center.y, blend),
            ),
            scale: lerp(t.scale, target_scale, blend),
            depth: t.depth,
            opacity: lerp(base_opacity, 1.0, blend),
            asset,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::{RenderPass, lerp};
    use crate::assets::{AssetState, TileAssets};
    use crate::style::{GalleryStyle, Rgba};
    use foundation::math::Vec2;
    use runtime::{Frame, Metrics};
    use scene::{DEFAULT_BACKFACE_LIMIT, TileTransform, Viewport};

    fn pass() -> RenderPass {
        RenderPass {
            style: GalleryStyle {
                grayscale: false,
                overlay_color: Rgba::new(0.0, 0.0, 0.0, 1.0),
            },
            viewport: Viewport::new(1000.0, 800.0),
            tile_edge_px: 100.0,
            backface_limit: DEFAULT_BACKFACE_LIMIT,
        }
    }

    fn transform(tile: usize, depth: f64, facing: f64, visible: bool) -> TileTransform {
        TileTransform {
            tile,
            screen: Vec2::new(100.0 + tile as f64 * 10.0, 200.0),
            scale: 0.9,
            depth,
            facing,
            visible,
        }
    }

    #[test]
    fn draws_are_ordered_back_to_front() {
        let transforms = vec![
            transform(0, 500.0, 1.0, true),
            transform(1, 900.0, 0.5, true),
            transform(2, 700.0, 0.8, true),
        ];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, None, &TileAssets::for_count(3), &mut Metrics::new());
        let order: Vec<usize> = frame.draws.iter().map(|d| d.tile).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn equal_depths_tie_break_by_tile_index() {
        let transforms = vec![
            transform(3, 600.0, 1.0, true),
            transform(1, 600.0, 1.0, true),
        ];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, None, &TileAssets::for_count(4), &mut Metrics::new());
        let order: Vec<usize> = frame.draws.iter().map(|d| d.tile).collect();
        assert_eq!(order, vec![1, 3]);
    }

    #[test]
    fn culled_tiles_are_excluded_and_counted() {
        let transforms = vec![
            transform(0, 500.0, 1.0, true),
            transform(1, 1600.0, -0.9, false),
        ];
        let mut metrics = Metrics::new();
        let frame = pass().compose(
            Frame::first(0.016),
            &transforms,
            None,
            &TileAssets::for_count(2),
            &mut metrics,
        );
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].tile, 0);
        assert_eq!(metrics.counter("tiles_projected"), 2);
        assert_eq!(metrics.counter("tiles_culled"), 1);
        assert_eq!(metrics.counter("tiles_drawn"), 1);
        assert_eq!(metrics.gauge("focused_tile"), Some(-1));
    }

    #[test]
    fn opacity_ramps_in_past_the_cull_threshold() {
        let transforms = vec![
            transform(0, 500.0, 1.0, true),
            transform(1, 900.0, 0.1, true),
        ];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, None, &TileAssets::for_count(2), &mut Metrics::new());
        let head_on = frame.draws.iter().find(|d| d.tile == 0).expect("tile 0");
        let edge = frame.draws.iter().find(|d| d.tile == 1).expect("tile 1");
        assert_eq!(head_on.opacity, 1.0);
        assert!(edge.opacity > 0.0 && edge.opacity < 0.5);
    }

    #[test]
    fn focused_tile_is_lifted_on_top_and_centered() {
        let transforms = vec![
            transform(0, 500.0, 1.0, true),
            transform(2, 700.0, 0.9, true),
        ];
        let mut metrics = Metrics::new();
        let frame = pass().compose(
            Frame::first(0.016),
            &transforms,
            Some((2, 1.0)),
            &TileAssets::for_count(3),
            &mut metrics,
        );

        assert_eq!(frame.draws.len(), 1, "focused tile leaves the draw list");
        let focused = frame.focused.expect("focused draw");
        assert_eq!(focused.tile, 2);
        assert_eq!(focused.screen, Vec2::new(500.0, 400.0));
        // 60% of the 800px short side over a 100px tile edge.
        assert!((focused.scale - 4.8).abs() < 1e-12);
        assert_eq!(focused.opacity, 1.0);

        let overlay = frame.overlay.expect("overlay");
        assert_eq!(overlay.alpha, 1.0);
        assert_eq!(overlay.tile, 2);
        assert_eq!(metrics.gauge("focused_tile"), Some(2));
    }

    #[test]
    fn half_blend_sits_halfway_to_center() {
        let transforms = vec![transform(2, 700.0, 0.9, true)];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, Some((2, 0.5)), &TileAssets::for_count(3), &mut Metrics::new());
        let focused = frame.focused.expect("focused draw");
        let projected_x = 120.0;
        assert!((focused.screen.x - lerp(projected_x, 500.0, 0.5)).abs() < 1e-12);
        assert_eq!(frame.overlay.expect("overlay").alpha, 0.5);
    }

    #[test]
    fn zero_blend_keeps_projection_and_skips_overlay() {
        let transforms = vec![transform(1, 700.0, 0.9, true)];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, Some((1, 0.0)), &TileAssets::for_count(2), &mut Metrics::new());
        let focused = frame.focused.expect("focused draw");
        assert_eq!(focused.screen, Vec2::new(110.0, 200.0));
        assert!(frame.overlay.is_none());
    }

    #[test]
    fn focused_tile_renders_even_when_culled() {
        let transforms = vec![transform(0, 1600.0, -0.9, false)];
        let frame =
            pass().compose(Frame::first(0.016), &transforms, Some((0, 1.0)), &TileAssets::for_count(1), &mut Metrics::new());
        let focused = frame.focused.expect("focused draw");
        assert_eq!(focused.opacity, 1.0);
        assert!(frame.draws.is_empty());
    }

    #[test]
    fn failed_assets_are_flagged_for_placeholders() {
        let transforms = vec![transform(0, 500.0, 1.0, true)];
        let mut assets = TileAssets::for_count(1);
        assets.mark_failed(0);
        let frame =
            pass().compose(Frame::first(0.016), &transforms, None, &assets, &mut Metrics::new());
        assert_eq!(frame.draws[0].asset, AssetState::Failed);
    }

    #[test]
    fn empty_transforms_compose_an_empty_frame() {
        let frame =
            pass().compose(Frame::first(0.016), &[], None, &TileAssets::for_count(0), &mut Metrics::new());
        assert!(frame.draws.is_empty());
        assert!(frame.overlay.is_none());
        assert!(frame.focused.is_none());
    }
}
