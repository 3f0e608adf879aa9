use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by every worker of a session.
#[derive(Debug, Default)]
pub struct RuntimeStats {
    pub(crate) inflight: AtomicUsize,
    pub(crate) rebuilt: AtomicUsize,
    pub(crate) empty: AtomicUsize,
    pub(crate) requeued: AtomicUsize,
    pub(crate) failed: AtomicUsize,
    pub(crate) generated: AtomicUsize,
    pub(crate) published: AtomicUsize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub queued: usize,
    pub inflight: usize,
    pub rebuilt: usize,
    pub empty: usize,
    pub requeued: usize,
    pub failed: usize,
    pub generated: usize,
    pub published: usize,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, queued: usize) -> StatsSnapshot {
        StatsSnapshot {
            queued,
            inflight: self.inflight.load(Ordering::Relaxed),
            rebuilt: self.rebuilt.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            requeued: self.requeued.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
        }
    }
}
