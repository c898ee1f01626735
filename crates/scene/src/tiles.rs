/// An image in display order.
///
/// The ordered list supplied by the host is the single source of truth for
/// tile identity: tile `i` shows image `i` for the lifetime of the mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub src: String,
    pub alt: String,
}

impl ImageItem {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// A tile fixed to the sphere at layout time.
///
/// Coordinates never change after layout; only the view orientation moves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereTile {
    /// Index into the image list.
    pub image: usize,
    /// Longitude around the vertical axis, radians; 0 faces the viewer.
    pub theta: f64,
    /// Latitude, radians; 0 is the equator.
    pub phi: f64,
}

impl SphereTile {
    pub fn new(image: usize, theta: f64, phi: f64) -> Self {
        Self { image, theta, phi }
    }
}
