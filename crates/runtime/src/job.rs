use crate::event_bus::EventBus;
use crate::frame::Frame;

/// A deterministic unit of per-frame work executed by the [`Scheduler`].
///
/// Jobs run in a stable order based on their `(priority, id)`. The gallery
/// leans on this for its frame contract: the job that mutates view state runs
/// at a lower priority value than the jobs that read it, so a frame can never
/// observe a half-updated orientation.
///
/// [`Scheduler`]: crate::scheduler::Scheduler
pub struct Job<Ctx> {
    pub id: &'static str,
    /// Smaller values run earlier.
    pub priority: i32,
    pub run: fn(ctx: &mut Ctx, frame: Frame, bus: &mut EventBus),
}

impl<Ctx> Job<Ctx> {
    pub fn new(id: &'static str, run: fn(ctx: &mut Ctx, frame: Frame, bus: &mut EventBus)) -> Self {
        Self {
            id,
            priority: 0,
            run,
        }
    }

    pub fn with_priority(
        id: &'static str,
        priority: i32,
        run: fn(ctx: &mut Ctx, frame: Frame, bus: &mut EventBus),
    ) -> Self {
        Self { id, priority, run }
    }
}
