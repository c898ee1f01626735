use crate::config::GalleryConfig;

/// RGBA color, components in `0..=1`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Fallback backdrop when an overlay color string cannot be parsed;
/// approximates the host theme's near-black `hsl(240 10% 3.9%)`.
pub const DEFAULT_OVERLAY_COLOR: Rgba = Rgba::new(0.035, 0.035, 0.043, 1.0);

/// Color keywords the overlay accepts. A closed set with a total mapping;
/// anything not listed here (and not `hsl()`/hex) falls back to the default
/// backdrop rather than failing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum NamedColor {
    Black,
    White,
    Transparent,
}

impl NamedColor {
    fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "black" => Some(NamedColor::Black),
            "white" => Some(NamedColor::White),
            "transparent" => Some(NamedColor::Transparent),
            _ => None,
        }
    }

    fn rgba(self) -> Rgba {
        match self {
            NamedColor::Black => Rgba::new(0.0, 0.0, 0.0, 1.0),
            NamedColor::White => Rgba::new(1.0, 1.0, 1.0, 1.0),
            NamedColor::Transparent => Rgba::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Parses a CSS color in the forms the gallery is actually configured with:
/// `hsl(H S% L%)` (space- or comma-separated), `#rgb`/`#rrggbb`, or a named
/// keyword. Unrecognized input falls back to [`DEFAULT_OVERLAY_COLOR`].
pub fn parse_css_color(s: &str) -> Rgba {
    let trimmed = s.trim().to_ascii_lowercase();
    if let Some(named) = NamedColor::from_keyword(&trimmed) {
        return named.rgba();
    }
    if let Some(rgba) = parse_hsl(&trimmed).or_else(|| parse_hex(&trimmed)) {
        return rgba;
    }
    tracing::debug!(input = s, "unrecognized overlay color, using default");
    DEFAULT_OVERLAY_COLOR
}

fn parse_hsl(s: &str) -> Option<Rgba> {
    let body = s.strip_prefix("hsl(")?.strip_suffix(')')?;
    let mut parts = body
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|p| !p.is_empty());

    let h: f64 = parts.next()?.parse().ok()?;
    let s_pct: f64 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    let l_pct: f64 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let (r, g, b) = hsl_to_rgb(
        h.rem_euclid(360.0),
        (s_pct / 100.0).clamp(0.0, 1.0),
        (l_pct / 100.0).clamp(0.0, 1.0),
    );
    Some(Rgba::new(r as f32, g as f32, b as f32, 1.0))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    (r1 + m, g1 + m, b1 + m)
}

fn parse_hex(s: &str) -> Option<Rgba> {
    let digits = s.strip_prefix('#')?;
    let (r, g, b) = match digits.len() {
        3 => {
            let mut it = digits.chars();
            let r = it.next()?.to_digit(16)?;
            let g = it.next()?.to_digit(16)?;
            let b = it.next()?.to_digit(16)?;
            ((r * 17) as f32, (g * 17) as f32, (b * 17) as f32)
        }
        6 => {
            let r = u32::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u32::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u32::from_str_radix(&digits[4..6], 16).ok()?;
            (r as f32, g as f32, b as f32)
        }
        _ => return None,
    };
    Some(Rgba::new(r / 255.0, g / 255.0, b / 255.0, 1.0))
}

/// Presentation flags applied uniformly to every tile, independent of
/// projection state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GalleryStyle {
    pub grayscale: bool,
    pub overlay_color: Rgba,
}

impl GalleryStyle {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            grayscale: config.grayscale,
            overlay_color: parse_css_color(&config.overlay_blur_color),
        }
    }
}
