use foundation::math::{Vec2, Vec3};

use crate::orientation::ViewOrientation;
use crate::tiles::SphereTile;

/// Camera distance from the sphere center, as a multiple of the radius.
const CAMERA_DISTANCE_FACTOR: f64 = 1.8;

/// Minimum facing (cosine off the view axis) before a tile is culled.
///
/// Slightly inside the front hemisphere so edge-on tiles never pop in and
/// out at the horizon of the sphere.
pub const DEFAULT_BACKFACE_LIMIT: f64 = 0.05;

/// View axis: the front of the band faces `-z`.
const FORWARD: Vec3 = Vec3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn min_extent(&self) -> f64 {
        self.width.min(self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// A tile's computed screen placement for one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileTransform {
    pub tile: usize,
    /// Tile center in screen pixels; x grows rightward, y downward.
    pub screen: Vec2,
    /// 1.0 for a head-on tile at the front of the sphere.
    pub scale: f64,
    /// Camera-space depth in pixels; larger is farther.
    pub depth: f64,
    /// Cosine of the angle between the tile and the view axis; 1 is dead
    /// ahead, negative is behind the sphere.
    pub facing: f64,
    pub visible: bool,
}

/// Fixed-perspective projection of sphere tiles into screen space.
///
/// Pure: the projector never mutates anything, and identical inputs always
/// produce identical transforms. Screen coordinates stay `f64` through the
/// whole pipeline; the host rounds once when it applies them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projector {
    pub viewport: Viewport,
    pub radius: f64,
    pub backface_limit: f64,
}

impl Projector {
    pub fn new(viewport: Viewport, radius: f64) -> Self {
        Self {
            viewport,
            radius: radius.max(1.0),
            backface_limit: DEFAULT_BACKFACE_LIMIT,
        }
    }

    pub fn with_backface_limit(viewport: Viewport, radius: f64, backface_limit: f64) -> Self {
        Self {
            backface_limit,
            ..Self::new(viewport, radius)
        }
    }

    /// Projects one tile under the given view orientation.
    pub fn project(&self, tile: SphereTile, view: &ViewOrientation) -> TileTransform {
        // Unit direction of the tile on the sphere.
        let (sin_t, cos_t) = tile.theta.sin_cos();
        let (sin_p, cos_p) = tile.phi.sin_cos();
        let dir = Vec3::new(cos_p * sin_t, sin_p, -cos_p * cos_t);

        // Grab semantics: positive yaw/pitch carry content right/down, so the
        // sphere rotates by the inverse of the view angles.
        let dir = rotate_y(dir, -view.yaw);
        let dir = rotate_x(dir, -view.pitch);

        let facing = dir.dot(FORWARD);
        let pos = dir * self.radius;

        // Camera sits at (0, 0, -D) looking along +z. The focal length puts a
        // front-center tile exactly at scale 1.
        let camera_distance = CAMERA_DISTANCE_FACTOR * self.radius;
        let focal = camera_distance - self.radius;
        let depth = pos.z + camera_distance;

        let center = self.viewport.center();
        let screen = Vec2::new(
            center.x + focal * pos.x / depth,
            center.y - focal * pos.y / depth,
        );

        TileTransform {
            tile: tile.image,
            screen,
            scale: focal / depth,
            depth,
            facing,
            visible: facing >= self.backface_limit,
        }
    }

    /// Projects every tile; transforms come back in tile order.
    pub fn project_all(&self, tiles: &[SphereTile], view: &ViewOrientation) -> Vec<TileTransform> {
        tiles.iter().map(|t| self.project(*t, view)).collect()
    }
}

fn rotate_y(v: Vec3, angle: f64) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(v.x * cos_a + v.z * sin_a, v.y, -v.x * sin_a + v.z * cos_a)
}

fn rotate_x(v: Vec3, angle: f64) -> Vec3 {
    let (sin_a, cos_a) = angle.sin_cos();
    Vec3::new(v.x, v.y * cos_a - v.z * sin_a, v.y * sin_a + v.z * cos_a)
}
