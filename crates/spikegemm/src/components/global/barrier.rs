/// Synchronization point between the produce (stage load) and consume
/// (compute) phases of the pipeline.
///
/// The engine executes phases sequentially, so arriving is immediate; what
/// matters is the generation count, which exposes the pipeline's
/// synchronization discipline to tests and tracing.
#[derive(Debug, Default)]
pub struct Barrier {
    generation: u64,
}

impl Barrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All participants arrive; the next phase may start.
    pub fn sync(&mut self) {
        self.generation += 1;
        log::trace!("barrier generation {}", self.generation);
    }

    /// Number of times the barrier has been crossed.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
