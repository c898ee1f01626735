use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use foundation::math::Vec2;
use gallery::{parse_images, parse_settings, DomeGallery, GalleryConfig};
use scene::{ImageItem, Viewport};

const DT: f64 = 1.0 / 60.0;

/// Headless driver for the dome gallery engine.
///
/// Loads a settings snapshot and image manifest (the shapes the gallery's
/// backing store serves), scripts a drag + tap session against the engine,
/// and logs frame summaries. With no files given it runs a built-in demo.
#[derive(Debug, Parser)]
#[command(name = "viewer")]
struct Args {
    /// Gallery settings snapshot (JSON object).
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Image manifest (JSON array of rows).
    #[arg(long)]
    images: Option<PathBuf>,
    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x720")]
    viewport: String,
    /// Frame cap for the inertial coast.
    #[arg(long, default_value_t = 600)]
    max_frames: u32,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match load_settings(&args.settings) {
        Ok(config) => config,
        Err(err) => {
            error!("failed to load settings: {err}");
            return ExitCode::FAILURE;
        }
    };
    let images = match load_images(&args.images) {
        Ok(images) => images,
        Err(err) => {
            error!("failed to load images: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = parse_viewport(&args.viewport).unwrap_or_else(|| {
        warn!(input = args.viewport.as_str(), "bad viewport, using 1280x720");
        (1280.0, 720.0)
    });

    run_session(config, images, width, height, args.max_frames);
    ExitCode::SUCCESS
}

fn load_settings(path: &Option<PathBuf>) -> Result<GalleryConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(parse_settings(&text)?)
        }
        None => Ok(GalleryConfig::default()),
    }
}

fn load_images(path: &Option<PathBuf>) -> Result<Vec<ImageItem>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Ok(parse_images(&text)?)
        }
        None => Ok(demo_images()),
    }
}

fn demo_images() -> Vec<ImageItem> {
    (0..12)
        .map(|i| {
            ImageItem::new(
                format!("https://picsum.photos/seed/dome-{i}/600/600"),
                format!("demo image {i}"),
            )
        })
        .collect()
}

fn parse_viewport(s: &str) -> Option<(f64, f64)> {
    let (w, h) = s.split_once('x')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn run_session(config: GalleryConfig, images: Vec<ImageItem>, width: f64, height: f64, max_frames: u32) {
    let mut gallery = DomeGallery::new(config, images, Viewport::new(width, height));
    let tiles = gallery.advance_frame(DT).draws.len();
    info!(tiles, radius = gallery.radius(), "gallery mounted");

    // Swipe right across the middle of the viewport, then let go.
    let mut t = 0.0;
    gallery.pointer_down(Vec2::new(width * 0.5, height * 0.5), t);
    for i in 1..=12 {
        t += DT;
        gallery.pointer_move(Vec2::new(width * 0.5 + 24.0 * i as f64, height * 0.5), t);
        gallery.advance_frame(DT);
    }
    t += DT;
    gallery.pointer_up(t);

    let mut coast_frames = 0;
    while gallery.needs_frame() && coast_frames < max_frames {
        let (frame_index, drawn) = {
            let frame = gallery.advance_frame(DT);
            (frame.frame_index, frame.draws.len())
        };
        coast_frames += 1;
        if coast_frames % 30 == 0 {
            info!(
                frame = frame_index,
                drawn,
                yaw = gallery.view().yaw,
                speed = gallery.view().angular_speed(),
                "coasting"
            );
        }
    }
    info!(frames = coast_frames, yaw = gallery.view().yaw, "inertia settled");

    // Tap the front-most tile, hold the overlay for a beat, dismiss.
    let front = gallery.advance_frame(DT).draws.last().copied();
    if let Some(front) = front {
        t += 1.0;
        gallery.pointer_down(front.screen, t);
        gallery.pointer_up(t + 0.05);
        match gallery.focused_tile() {
            Some(tile) => info!(tile, "tile focused"),
            None => warn!("tap resolved no tile"),
        }
        while gallery.needs_frame() {
            gallery.advance_frame(DT);
        }

        gallery.dismiss();
        while gallery.needs_frame() {
            gallery.advance_frame(DT);
        }
        info!("overlay dismissed");
    }

    for event in gallery.drain_events() {
        debug!(
            frame = event.frame_index,
            kind = event.kind,
            "{}",
            event.message
        );
    }
    for (name, value) in gallery.metrics_snapshot().counters {
        info!(counter = name.as_str(), value, "session metric");
    }

    gallery.unmount();
}
