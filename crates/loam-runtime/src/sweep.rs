use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};

use hashbrown::HashSet;
use loam_blocks::BlockCatalog;
use loam_chunk::{ChunkRegistry, ChunkState, PublishAttempt, RebuildAttempt, VertexUploader};
use loam_world::ChunkCoord;
use rayon::prelude::*;

use crate::error::RuntimeError;
use crate::queue::UpdateQueue;
use crate::stats::RuntimeStats;

// Contended chunks are retried this many times inside one sweep before being
// handed to the update queue.
const SWEEP_RETRIES: usize = 32;

/// Everything a rebuild needs, cheap to clone into worker threads.
#[derive(Clone)]
pub struct RebuildCtx {
    pub registry: Arc<ChunkRegistry>,
    pub catalog: Arc<BlockCatalog>,
    pub uploader: Arc<dyn VertexUploader>,
    pub queue: UpdateQueue,
    pub stats: Arc<RuntimeStats>,
}

impl RebuildCtx {
    /// One data rebuild attempt. A panic inside the rebuild is contained and
    /// reported as `None`.
    pub(crate) fn attempt(&self, coord: ChunkCoord) -> Option<RebuildAttempt> {
        self.stats.inflight.fetch_add(1, Ordering::Relaxed);
        let res = catch_unwind(AssertUnwindSafe(|| {
            self.registry.try_rebuild_data(coord, &self.catalog)
        }));
        self.stats.inflight.fetch_sub(1, Ordering::Relaxed);
        match res {
            Ok(a) => {
                match a {
                    RebuildAttempt::Built(_) => {
                        self.stats.rebuilt.fetch_add(1, Ordering::Relaxed);
                    }
                    RebuildAttempt::Empty => {
                        self.stats.empty.fetch_add(1, Ordering::Relaxed);
                    }
                    _ => {}
                }
                Some(a)
            }
            Err(_) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                log::error!(target: "scheduler", "rebuild of ({},{}) panicked; skipped", coord.x, coord.z);
                None
            }
        }
    }

    /// Retries contention a bounded number of times, then requeues.
    fn attempt_with_retry(&self, coord: ChunkCoord) -> Option<RebuildAttempt> {
        for _ in 0..SWEEP_RETRIES {
            match self.attempt(coord) {
                Some(RebuildAttempt::Contended) => thread::yield_now(),
                other => return other,
            }
        }
        self.requeue(coord);
        Some(RebuildAttempt::Contended)
    }

    pub(crate) fn requeue(&self, coord: ChunkCoord) {
        self.stats.requeued.fetch_add(1, Ordering::Relaxed);
        self.queue.push(coord);
    }

    fn publish(&self, coord: ChunkCoord, report: &mut SweepReport) {
        match self.registry.try_publish(coord, self.uploader.as_ref()) {
            Some(PublishAttempt::Published(_)) => {
                self.stats.published.fetch_add(1, Ordering::Relaxed);
                report.published += 1;
            }
            // left for the next publish pass
            Some(PublishAttempt::Contended) => report.contended += 1,
            _ => {}
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub visited: usize,
    pub rebuilt: usize,
    pub empty: usize,
    pub already_fresh: usize,
    pub contended: usize,
    pub failed: usize,
    pub published: usize,
}

impl SweepReport {
    fn record(&mut self, attempt: Option<RebuildAttempt>) {
        self.visited += 1;
        match attempt {
            Some(RebuildAttempt::Built(_)) => self.rebuilt += 1,
            Some(RebuildAttempt::Empty) => self.empty += 1,
            Some(RebuildAttempt::AlreadyFresh) => self.already_fresh += 1,
            Some(RebuildAttempt::Contended) => self.contended += 1,
            Some(RebuildAttempt::Missing) => {}
            None => self.failed += 1,
        }
    }
}

/// Rebuilds every stale chunk in the registry, then uploads every chunk whose
/// data is fresh. The data phase runs on the rayon pool.
pub fn sweep_all(ctx: &RebuildCtx) -> SweepReport {
    let coords = ctx.registry.coords();
    let first: Vec<(ChunkCoord, Option<RebuildAttempt>)> = coords
        .par_iter()
        .map(|&c| (c, ctx.attempt(c)))
        .collect();

    let mut report = SweepReport::default();
    let mut retry = Vec::new();
    for (c, a) in first {
        if a == Some(RebuildAttempt::Contended) {
            retry.push(c);
        } else {
            report.record(a);
        }
    }
    // Sequential second chance for chunks that collided with a neighbor's rebuild.
    for c in retry {
        report.record(ctx.attempt_with_retry(c));
    }

    for c in coords {
        ctx.publish(c, &mut report);
    }
    log::debug!(target: "scheduler", "sweep_all {:?}", report);
    report
}

/// Breadth-first rebuild from `start`, following live neighbors that are
/// still stale. Each chunk is visited at most once.
pub fn sweep_from(ctx: &RebuildCtx, start: ChunkCoord) -> SweepReport {
    let side = ctx.registry.dims().side_i32();
    let mut report = SweepReport::default();
    let mut visited: HashSet<ChunkCoord> = HashSet::new();
    let mut frontier = VecDeque::new();
    visited.insert(start);
    frontier.push_back(start);

    while let Some(c) = frontier.pop_front() {
        let attempt = ctx.attempt_with_retry(c);
        report.record(attempt);
        if attempt == Some(RebuildAttempt::Missing) {
            continue;
        }
        ctx.publish(c, &mut report);

        for (n, handle) in c.neighbors(side).into_iter().zip(ctx.registry.neighbors(c)) {
            let Some(handle) = handle else { continue };
            if visited.contains(&n) {
                continue;
            }
            if handle.state() == ChunkState::Stale {
                visited.insert(n);
                frontier.push_back(n);
            }
        }
    }
    log::debug!(target: "scheduler", "sweep_from ({},{}) {:?}", start.x, start.z, report);
    report
}

/// Completion handle for a background sweep.
pub struct SweepJob {
    handle: JoinHandle<SweepReport>,
}

impl SweepJob {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) -> Result<SweepReport, RuntimeError> {
        self.handle
            .join()
            .map_err(|_| RuntimeError::WorkerPanicked("sweep"))
    }
}

fn spawn_sweep(name: &str, f: impl FnOnce() -> SweepReport + Send + 'static) -> Result<SweepJob, RuntimeError> {
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(RuntimeError::Spawn)?;
    Ok(SweepJob { handle })
}

pub fn spawn_sweep_all(ctx: RebuildCtx) -> Result<SweepJob, RuntimeError> {
    spawn_sweep("loam-sweep-all", move || sweep_all(&ctx))
}

pub fn spawn_sweep_from(ctx: RebuildCtx, start: ChunkCoord) -> Result<SweepJob, RuntimeError> {
    spawn_sweep("loam-sweep-from", move || sweep_from(&ctx, start))
}
