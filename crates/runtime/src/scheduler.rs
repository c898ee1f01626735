use crate::event_bus::EventBus;
use crate::frame::Frame;
use crate::job::Job;

/// Deterministic per-frame job pipeline over a caller-owned context.
///
/// The scheduler is the one repeating task in the engine: registered at
/// mount, run once per frame, and cancelled (cleared) at unmount. Nothing it
/// schedules can outlive the component that owns it.
pub struct Scheduler<Ctx> {
    next_order: u64,
    jobs: Vec<(u64, Job<Ctx>)>,
}

impl<Ctx> Default for Scheduler<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> Scheduler<Ctx> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            jobs: Vec::new(),
        }
    }

    pub fn add_job(&mut self, job: Job<Ctx>) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.jobs.push((order, job));
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Cancels the pipeline. Subsequent `run_frame` calls are no-ops.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Runs all jobs against `ctx` in a deterministic order for the given
    /// frame.
    ///
    /// Ordering is total: `(priority, id, insertion_order)`. This stays
    /// deterministic even if callers accidentally register duplicate job ids.
    pub fn run_frame(&mut self, ctx: &mut Ctx, frame: Frame, bus: &mut EventBus) {
        self.jobs.sort_by(|(oa, a), (ob, b)| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(b.id))
                .then_with(|| oa.cmp(ob))
        });

        for (_order, job) in &self.jobs {
            (job.run)(ctx, frame, bus);
        }
    }
}
