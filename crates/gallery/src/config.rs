use foundation::math::deg_to_rad;
use scene::Viewport;

/// Supported ranges for the numeric options, matching the admin sliders that
/// produce them. Values outside a range clamp to its nearest edge.
pub const FIT_RANGE: (f64, f64) = (0.1, 2.0);
pub const MIN_RADIUS_RANGE: (f64, f64) = (0.0, 4000.0);
pub const MAX_VERTICAL_ROTATION_RANGE: (f64, f64) = (0.0, 45.0);
pub const SEGMENTS_RANGE: (u32, u32) = (4, 100);
pub const DRAG_DAMPENING_RANGE: (f64, f64) = (0.0, 16.0);

/// Tunable gallery options.
///
/// Every constructor path goes through [`GalleryConfig::normalized`]:
/// configuration anomalies are a presentation concern, recovered by clamping,
/// and never surface as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Scales the sphere radius relative to the viewport's short side.
    pub fit: f64,
    /// Floor on the sphere radius in pixels, regardless of viewport size.
    pub min_radius: f64,
    /// Pitch bound in degrees; 0 disables vertical tilt entirely.
    pub max_vertical_rotation_deg: f64,
    /// Grid density for tile placement; 0 means no tiles at all.
    pub segments: u32,
    /// Inertia decay rate; higher stops post-release rotation sooner.
    pub drag_dampening: f64,
    /// Render all tiles desaturated.
    pub grayscale: bool,
    /// CSS color behind the focused tile.
    pub overlay_blur_color: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            fit: 0.9,
            min_radius: 600.0,
            max_vertical_rotation_deg: 0.0,
            segments: 34,
            drag_dampening: 2.0,
            grayscale: false,
            overlay_blur_color: "hsl(240 10% 3.9%)".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Clamps every numeric field into its supported range.
    ///
    /// `segments == 0` is preserved: it means "render nothing" rather than
    /// being an anomaly.
    pub fn normalized(&self) -> Self {
        let out = Self {
            fit: self.fit.clamp(FIT_RANGE.0, FIT_RANGE.1),
            min_radius: self.min_radius.clamp(MIN_RADIUS_RANGE.0, MIN_RADIUS_RANGE.1),
            max_vertical_rotation_deg: self
                .max_vertical_rotation_deg
                .clamp(MAX_VERTICAL_ROTATION_RANGE.0, MAX_VERTICAL_ROTATION_RANGE.1),
            segments: if self.segments == 0 {
                0
            } else {
                self.segments.clamp(SEGMENTS_RANGE.0, SEGMENTS_RANGE.1)
            },
            drag_dampening: self
                .drag_dampening
                .clamp(DRAG_DAMPENING_RANGE.0, DRAG_DAMPENING_RANGE.1),
            grayscale: self.grayscale,
            overlay_blur_color: self.overlay_blur_color.clone(),
        };
        if out != *self {
            tracing::warn!("gallery config clamped into supported ranges");
        }
        out
    }

    /// Pitch bound in radians.
    pub fn pitch_limit_rad(&self) -> f64 {
        deg_to_rad(self.max_vertical_rotation_deg)
    }

    /// Sphere radius for the given viewport: `fit` scales against the short
    /// side, floored by `min_radius`. Never negative.
    pub fn effective_radius(&self, viewport: Viewport) -> f64 {
        (self.fit * viewport.min_extent()).max(self.min_radius)
    }
}
