use serde::Deserialize;

use scene::ImageItem;

use crate::config::GalleryConfig;

/// One row of the gallery settings store.
///
/// Field names match the backing table's columns; unknown columns are
/// ignored and missing ones fall back to the component defaults, mirroring
/// how the host pages read the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GallerySettingsRow {
    pub fit: f64,
    pub min_radius: f64,
    pub max_vertical_rotation_deg: f64,
    pub segments: i64,
    pub drag_dampening: f64,
    pub grayscale: bool,
}

impl Default for GallerySettingsRow {
    fn default() -> Self {
        let cfg = GalleryConfig::default();
        Self {
            fit: cfg.fit,
            min_radius: cfg.min_radius,
            max_vertical_rotation_deg: cfg.max_vertical_rotation_deg,
            segments: cfg.segments as i64,
            drag_dampening: cfg.drag_dampening,
            grayscale: cfg.grayscale,
        }
    }
}

impl GallerySettingsRow {
    /// Converts the raw row into a normalized config. A negative segment
    /// count from a corrupt row clamps like any other anomaly.
    pub fn into_config(self) -> GalleryConfig {
        GalleryConfig {
            fit: self.fit,
            min_radius: self.min_radius,
            max_vertical_rotation_deg: self.max_vertical_rotation_deg,
            segments: self.segments.max(0).min(u32::MAX as i64) as u32,
            drag_dampening: self.drag_dampening,
            grayscale: self.grayscale,
            ..GalleryConfig::default()
        }
        .normalized()
    }
}

/// One row of the gallery image store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRecord {
    pub image_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    Malformed(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Malformed(msg) => write!(f, "malformed settings snapshot: {msg}"),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Parses a settings snapshot (one JSON object) into a normalized config.
pub fn parse_settings(json: &str) -> Result<GalleryConfig, SettingsError> {
    let row: GallerySettingsRow =
        serde_json::from_str(json).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    Ok(row.into_config())
}

/// Parses an image manifest (JSON array of rows) into display order.
///
/// The sort is stable, so rows sharing a `display_order` keep their input
/// order, matching the store's ordered query.
pub fn parse_images(json: &str) -> Result<Vec<ImageItem>, SettingsError> {
    let mut rows: Vec<ImageRecord> =
        serde_json::from_str(json).map_err(|e| SettingsError::Malformed(e.to_string()))?;
    rows.sort_by_key(|r| r.display_order);
    Ok(rows
        .into_iter()
        .map(|r| ImageItem::new(r.image_url, r.alt_text.unwrap_or_default()))
        .collect())
}
