use std::sync::atomic::Ordering;

use loam_chunk::{ChunkRegistry, PublishAttempt, VertexUploader};

use crate::stats::RuntimeStats;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: usize,
    /// Chunks whose data is still stale.
    pub pending: usize,
    /// Chunks locked by a worker; they keep drawing their last buffer.
    pub busy: usize,
}

/// Buffer pass for the render thread: uploads every chunk whose data is fresh
/// and whose buffer is not. Never waits on a chunk lock.
pub fn publish_ready(registry: &ChunkRegistry, uploader: &dyn VertexUploader, stats: &RuntimeStats) -> PublishReport {
    let mut report = PublishReport::default();
    for handle in registry.handles() {
        match handle.try_publish(uploader) {
            PublishAttempt::Published(_) => {
                stats.published.fetch_add(1, Ordering::Relaxed);
                report.published += 1;
            }
            PublishAttempt::NotReady => report.pending += 1,
            PublishAttempt::Contended => report.busy += 1,
            PublishAttempt::AlreadyFresh => {}
        }
    }
    if report.published > 0 {
        log::trace!(target: "scheduler", "published {:?}", report);
    }
    report
}
