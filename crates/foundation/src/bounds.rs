use crate::math::Vec2;

/// Axis-aligned bounding box in screen space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// A square box centered on `center` with the given half extent.
    pub fn from_center_half_extent(center: Vec2, half: f64) -> Self {
        let half = half.max(0.0);
        Aabb2 {
            min: Vec2::new(center.x - half, center.y - half),
            max: Vec2::new(center.x + half, center.y + half),
        }
    }

    /// Inclusive containment on all edges.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }
}
