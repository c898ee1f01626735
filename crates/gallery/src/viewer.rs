use foundation::math::Vec2;
use runtime::{Event, EventBus, Frame, Job, Metrics, MetricsSnapshot, Scheduler};
use scene::{
    ImageItem, Projector, SphereTile, TileTransform, ViewOrientation, Viewport, layout_tiles,
    pick_tile, tile_edge_px,
};
use tracing::debug;

use crate::assets::TileAssets;
use crate::config::GalleryConfig;
use crate::controller::{DragController, DragPhase, PressOutcome, ReleaseOutcome};
use crate::focus::FocusTransition;
use crate::render::{RenderFrame, RenderPass};
use crate::style::GalleryStyle;

/// Everything the per-frame jobs read and write.
struct ViewerState {
    config: GalleryConfig,
    images: Vec<ImageItem>,
    tiles: Vec<SphereTile>,
    projector: Projector,
    controller: DragController,
    focus: Option<FocusTransition>,
    assets: TileAssets,
    style: GalleryStyle,
    transforms: Vec<TileTransform>,
    composed: RenderFrame,
    metrics: Metrics,
    dirty: bool,
}

impl ViewerState {
    fn tile_edge(&self) -> f64 {
        tile_edge_px(self.projector.radius, self.config.segments)
    }
}

/// Writes view state. Must run before anything reads it, hence the lowest
/// priority value in the pipeline.
fn simulate(state: &mut ViewerState, frame: Frame, bus: &mut EventBus) {
    let was_coasting = state.controller.phase() == DragPhase::Releasing;
    let coasting = state.controller.update(frame.dt_s);
    if was_coasting && !coasting {
        bus.emit(frame, "drag", "settled");
    }

    if let Some(transition) = state.focus
        && transition.is_closing()
        && transition.finished(frame.time)
    {
        state.focus = None;
    }
}

/// Reads view state, writes transforms.
fn project(state: &mut ViewerState, _frame: Frame, _bus: &mut EventBus) {
    state.transforms = state
        .projector
        .project_all(&state.tiles, state.controller.view());
}

/// Reads transforms, writes the frame's draw lists.
fn compose(state: &mut ViewerState, frame: Frame, _bus: &mut EventBus) {
    let focus = state
        .focus
        .map(|transition| (transition.tile(), transition.blend(frame.time)));
    let pass = RenderPass {
        style: state.style,
        viewport: state.projector.viewport,
        tile_edge_px: state.tile_edge(),
        backface_limit: state.projector.backface_limit,
    };
    state.composed = pass.compose(
        frame,
        &state.transforms,
        focus,
        &state.assets,
        &mut state.metrics,
    );
}

/// The dome gallery component.
///
/// Single-threaded and frame-driven: the host forwards pointer/resize events
/// between frames and calls [`DomeGallery::advance_frame`] while
/// [`DomeGallery::needs_frame`] reports true. Within a frame the scheduler
/// runs simulate before project before compose, so a projection pass can
/// never observe a half-updated orientation.
pub struct DomeGallery {
    state: ViewerState,
    scheduler: Scheduler<ViewerState>,
    bus: EventBus,
    frame: Frame,
    mounted: bool,
}

impl DomeGallery {
    pub fn new(config: GalleryConfig, images: Vec<ImageItem>, viewport: Viewport) -> Self {
        let config = config.normalized();
        let radius = config.effective_radius(viewport);
        let tiles = layout_tiles(config.segments, images.len());
        let style = GalleryStyle::from_config(&config);
        let controller =
            DragController::new(radius, config.pitch_limit_rad(), config.drag_dampening);
        let assets = TileAssets::for_count(images.len());

        let mut scheduler = Scheduler::new();
        scheduler.add_job(Job::with_priority("simulate", 10, simulate));
        scheduler.add_job(Job::with_priority("project", 20, project));
        scheduler.add_job(Job::with_priority("compose", 30, compose));

        let frame = Frame::first(0.0);
        let mut bus = EventBus::new();
        bus.emit(frame, "lifecycle", "mounted");
        debug!(
            tiles = tiles.len(),
            radius, "dome gallery mounted"
        );

        Self {
            state: ViewerState {
                config,
                images,
                tiles,
                projector: Projector::new(viewport, radius),
                controller,
                focus: None,
                assets,
                style,
                transforms: Vec::new(),
                composed: RenderFrame::empty(0, style),
                metrics: Metrics::new(),
                dirty: true,
            },
            scheduler,
            bus,
            frame,
            mounted: true,
        }
    }

    /// Pointer press, in viewport pixels with a caller-supplied timestamp.
    pub fn pointer_down(&mut self, pos: Vec2, time_s: f64) {
        if !self.mounted {
            return;
        }
        match self.state.controller.pointer_down(pos, time_s) {
            PressOutcome::StartedDrag => {
                self.bus.emit(self.frame, "drag", "start");
                self.state.dirty = true;
            }
            PressOutcome::DismissedFocus => {
                self.begin_focus_close();
                self.bus.emit(self.frame, "focus", "dismissed by press");
                self.state.dirty = true;
            }
            PressOutcome::Ignored => {}
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2, time_s: f64) {
        if !self.mounted {
            return;
        }
        self.state.controller.pointer_move(pos, time_s);
        if self.state.controller.phase() == DragPhase::Dragging {
            self.state.dirty = true;
        }
    }

    /// Pointer release. A tap is resolved against the last projected frame:
    /// tapping a visible tile focuses it, tapping the backdrop does nothing.
    pub fn pointer_up(&mut self, time_s: f64) {
        if !self.mounted {
            return;
        }
        match self.state.controller.pointer_up(time_s) {
            ReleaseOutcome::Tap { at } => {
                let edge = self.state.tile_edge();
                if let Some(hit) = pick_tile(&self.state.transforms, at, edge) {
                    self.state.controller.focus_tile(hit.tile);
                    self.state.focus =
                        Some(FocusTransition::opening(hit.tile, self.frame.time));
                    self.bus
                        .emit(self.frame, "focus", format!("tile {}", hit.tile));
                }
                self.state.dirty = true;
            }
            ReleaseOutcome::Coasting => {
                self.bus.emit(self.frame, "drag", "release");
                self.state.dirty = true;
            }
            ReleaseOutcome::Settled => {
                self.bus.emit(self.frame, "drag", "settled");
                self.state.dirty = true;
            }
            ReleaseOutcome::Ignored => {}
        }
    }

    /// Overlay dismissal: click-outside or escape, as the host maps them.
    pub fn dismiss(&mut self) {
        if !self.mounted {
            return;
        }
        if self.state.controller.dismiss() {
            self.begin_focus_close();
            self.bus.emit(self.frame, "focus", "dismissed");
            self.state.dirty = true;
        }
    }

    /// Viewport change. The effective radius is recomputed before the next
    /// projection pass; drag sensitivity follows it.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if !self.mounted {
            return;
        }
        let viewport = Viewport::new(width, height);
        let radius = self.state.config.effective_radius(viewport);
        self.state.projector = Projector::new(viewport, radius);
        self.state.controller.set_radius(radius);
        self.bus.emit(
            self.frame,
            "resize",
            format!("{}x{} radius {radius}", viewport.width, viewport.height),
        );
        self.state.dirty = true;
    }

    /// Replaces the image list and rebuilds the tile set. Focus does not
    /// survive: tile identity is bound to the list that produced it.
    pub fn set_images(&mut self, images: Vec<ImageItem>) {
        if !self.mounted {
            return;
        }
        self.state.controller.dismiss();
        self.state.focus = None;
        self.state.tiles = layout_tiles(self.state.config.segments, images.len());
        self.state.assets = TileAssets::for_count(images.len());
        self.state.images = images;
        self.state.dirty = true;
    }

    /// Applies a new configuration, rebuilding tiles if the grid density
    /// changed.
    pub fn set_config(&mut self, config: GalleryConfig) {
        if !self.mounted {
            return;
        }
        let config = config.normalized();
        let segments_changed = config.segments != self.state.config.segments;
        let viewport = self.state.projector.viewport;
        let radius = config.effective_radius(viewport);

        self.state.projector = Projector::new(viewport, radius);
        self.state.controller.set_radius(radius);
        self.state
            .controller
            .set_pitch_limit(config.pitch_limit_rad());
        self.state.controller.set_dampening(config.drag_dampening);
        self.state.style = GalleryStyle::from_config(&config);
        if segments_changed {
            self.state.tiles = layout_tiles(config.segments, self.state.images.len());
        }
        self.state.config = config;
        self.bus.emit(self.frame, "config", "updated");
        self.state.dirty = true;
    }

    pub fn mark_image_ready(&mut self, tile: usize) {
        self.state.assets.mark_ready(tile);
        self.state.dirty = true;
    }

    pub fn mark_image_failed(&mut self, tile: usize) {
        self.state.assets.mark_failed(tile);
        self.state.dirty = true;
    }

    /// Runs one frame of the pipeline and returns its draw lists.
    pub fn advance_frame(&mut self, dt_s: f64) -> &RenderFrame {
        if !self.mounted {
            return &self.state.composed;
        }
        self.frame = self.frame.next(dt_s);
        self.scheduler
            .run_frame(&mut self.state, self.frame, &mut self.bus);
        self.state.dirty = false;
        &self.state.composed
    }

    /// True while another frame would change anything: pending input, an
    /// inertial coast, or a running focus transition. False at rest, so a
    /// well-behaved host stops scheduling frames entirely.
    pub fn needs_frame(&self) -> bool {
        self.mounted
            && (self.state.dirty
                || self.state.controller.phase() == DragPhase::Releasing
                || self
                    .state
                    .focus
                    .is_some_and(|t| !t.finished(self.frame.time)))
    }

    /// Cancels the frame pipeline. Subsequent events and frames are no-ops;
    /// nothing schedulable outlives the component.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.clear();
        self.mounted = false;
        self.state.focus = None;
        self.state.composed = RenderFrame::empty(self.frame.index, self.state.style);
        self.bus.emit(self.frame, "lifecycle", "unmounted");
        debug!("dome gallery unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn view(&self) -> &ViewOrientation {
        self.state.controller.view()
    }

    pub fn phase(&self) -> DragPhase {
        self.state.controller.phase()
    }

    pub fn focused_tile(&self) -> Option<usize> {
        self.state.controller.view().focused_tile
    }

    /// Last projected transforms, in tile order. Empty until the first
    /// frame has run.
    pub fn transforms(&self) -> &[TileTransform] {
        &self.state.transforms
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.state.config
    }

    pub fn images(&self) -> &[ImageItem] {
        &self.state.images
    }

    pub fn radius(&self) -> f64 {
        self.state.projector.radius
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.state.metrics.snapshot()
    }

    /// Drains the trace event log.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    fn begin_focus_close(&mut self) {
        if let Some(transition) = self.state.focus
            && !transition.is_closing()
        {
            self.state.focus = Some(FocusTransition::closing(transition.tile(), self.frame.time));
        }
    }
}
