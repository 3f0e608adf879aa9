use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use hashbrown::HashSet;
use loam_chunk::{Chunk, ChunkRegistry};
use loam_world::{ChunkCoord, HeightProfile};

use crate::anchor::ViewAnchor;
use crate::error::RuntimeError;
use crate::queue::UpdateQueue;
use crate::stats::RuntimeStats;

/// Chunk origins within `radius` chunks of `center`, nearest first.
pub fn frontier(center: ChunkCoord, radius: i32, side: i32) -> Vec<ChunkCoord> {
    let r2 = i64::from(radius) * i64::from(radius);
    let mut out = Vec::new();
    let mut seen: HashSet<ChunkCoord> = HashSet::new();
    let mut q = VecDeque::new();
    seen.insert(center);
    q.push_back(center);
    while let Some(c) = q.pop_front() {
        out.push(c);
        for n in c.neighbors(side) {
            if n.grid_distance_sq(center, side) <= r2 && seen.insert(n) {
                q.push_back(n);
            }
        }
    }
    out
}

/// Expands the world around the view anchor, one chunk at a time.
pub struct TerrainGenerator {
    pub registry: Arc<ChunkRegistry>,
    pub queue: UpdateQueue,
    pub profile: Arc<dyn HeightProfile>,
    pub anchor: ViewAnchor,
    pub radius: i32,
    pub idle: Duration,
    pub stats: Arc<RuntimeStats>,
}

impl TerrainGenerator {
    /// Creates every missing chunk on the current frontier. Stops early when
    /// `stop` returns true; returns how many chunks were created.
    pub fn generate_pass(&self, stop: impl Fn() -> bool) -> usize {
        let dims = self.registry.dims();
        let side = dims.side_i32();
        let center = self.anchor.chunk(dims);
        let mut created = 0;
        for coord in frontier(center, self.radius, side) {
            if stop() {
                break;
            }
            if self.registry.contains(coord) {
                continue;
            }
            let chunk = Chunk::populated(coord, dims, self.profile.as_ref());
            match self.registry.insert_if_absent(chunk) {
                Ok(Some(_)) => {
                    created += 1;
                    self.stats.generated.fetch_add(1, Ordering::Relaxed);
                    self.queue.push(coord);
                    for n in coord.neighbors(side) {
                        // Earlier chunks treated this edge as open; recompute them.
                        if let Some(h) = self.registry.get(n) {
                            h.mark_stale();
                        }
                        self.queue.push(n);
                    }
                    log::debug!(target: "terrain", "generated ({},{})", coord.x, coord.z);
                }
                // lost the race to an edit that created it first
                Ok(None) => {}
                Err(e) => log::warn!(target: "terrain", "{e}"),
            }
        }
        created
    }

    pub fn spawn(self) -> Result<TerrainHandle, RuntimeError> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name("loam-terrain".to_string())
            .spawn(move || self.run(shutdown_rx))
            .map_err(RuntimeError::Spawn)?;
        Ok(TerrainHandle {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    fn run(self, shutdown_rx: Receiver<()>) {
        log::info!(target: "terrain", "terrain loop started radius={}", self.radius);
        let stopped = || matches!(shutdown_rx.try_recv(), Err(TryRecvError::Disconnected));
        loop {
            let created = self.generate_pass(stopped);
            if stopped() {
                break;
            }
            if created > 0 {
                continue;
            }
            match shutdown_rx.recv_timeout(self.idle) {
                Err(RecvTimeoutError::Timeout) => {}
                _ => break,
            }
        }
        log::info!(target: "terrain", "terrain loop stopped");
    }
}

pub struct TerrainHandle {
    shutdown_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TerrainHandle {
    pub fn shutdown(&mut self) {
        self.shutdown_tx.take();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn join(mut self) -> Result<(), RuntimeError> {
        self.shutdown();
        match self.handle.take() {
            Some(h) => h.join().map_err(|_| RuntimeError::WorkerPanicked("terrain")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_is_a_disc_nearest_first() {
        let f = frontier(ChunkCoord::new(0, 0), 2, 8);
        // |dx|,|dz| with dx^2+dz^2 <= 4
        assert_eq!(f.len(), 13);
        assert_eq!(f[0], ChunkCoord::new(0, 0));
        for c in &f[1..5] {
            assert_eq!(c.grid_distance_sq(ChunkCoord::new(0, 0), 8), 1);
        }
        assert!(f.contains(&ChunkCoord::new(-16, 0)));
        assert!(!f.contains(&ChunkCoord::new(16, 16)));
    }

    #[test]
    fn zero_radius_is_just_the_center() {
        assert_eq!(frontier(ChunkCoord::new(-8, 8), 0, 8), vec![ChunkCoord::new(-8, 8)]);
    }
}
