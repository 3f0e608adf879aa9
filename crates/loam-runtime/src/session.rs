use std::sync::Arc;
use std::time::Duration;

use loam_blocks::{BlockCatalog, BlockId};
use loam_chunk::{ChunkError, ChunkRegistry, PublishedMesh, VertexUploader};
use loam_world::{ChunkCoord, HeightProfile, WorldDims};

use crate::anchor::ViewAnchor;
use crate::error::RuntimeError;
use crate::publish::{PublishReport, publish_ready};
use crate::queue::UpdateQueue;
use crate::stats::{RuntimeStats, StatsSnapshot};
use crate::sweep::{RebuildCtx, SweepJob, SweepReport, spawn_sweep_all, spawn_sweep_from, sweep_all, sweep_from};
use crate::terrain::{TerrainGenerator, TerrainHandle};
use crate::worker::RebuildWorkers;

/// One world: its registry, the update queue feeding it, and the background
/// workers it owns. Dropping the session stops and joins them.
pub struct Session {
    registry: Arc<ChunkRegistry>,
    catalog: Arc<BlockCatalog>,
    uploader: Arc<dyn VertexUploader>,
    queue: UpdateQueue,
    stats: Arc<RuntimeStats>,
    anchor: ViewAnchor,
    terrain: Option<TerrainHandle>,
    workers: Option<RebuildWorkers>,
}

impl Session {
    pub fn new(dims: WorldDims, catalog: Arc<BlockCatalog>, uploader: Arc<dyn VertexUploader>) -> Self {
        log::info!(target: "session", "new session side={} height={}", dims.side, dims.height);
        Self {
            registry: Arc::new(ChunkRegistry::new(dims)),
            catalog,
            uploader,
            queue: UpdateQueue::new(),
            stats: Arc::new(RuntimeStats::new()),
            anchor: ViewAnchor::default(),
            terrain: None,
            workers: None,
        }
    }

    pub fn registry(&self) -> &Arc<ChunkRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn queue(&self) -> &UpdateQueue {
        &self.queue
    }

    pub fn anchor(&self) -> ViewAnchor {
        self.anchor.clone()
    }

    pub fn set_view(&self, pos: [f32; 3]) {
        self.anchor.set(pos);
    }

    pub fn rebuild_ctx(&self) -> RebuildCtx {
        RebuildCtx {
            registry: Arc::clone(&self.registry),
            catalog: Arc::clone(&self.catalog),
            uploader: Arc::clone(&self.uploader),
            queue: self.queue.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    pub fn add_block(&self, id: BlockId, x: i32, y: i32, z: i32) -> Result<(), ChunkError> {
        match self.registry.add_block(id, x, y, z) {
            Ok(affected) => {
                self.queue.push_all(affected);
                Ok(())
            }
            Err(e) => {
                log::warn!(target: "session", "add_block: {e}");
                Err(e)
            }
        }
    }

    pub fn remove_block(&self, x: i32, y: i32, z: i32) -> Result<(), ChunkError> {
        match self.registry.remove_block(x, y, z) {
            Ok(affected) => {
                self.queue.push_all(affected);
                Ok(())
            }
            Err(e) => {
                log::warn!(target: "session", "remove_block: {e}");
                Err(e)
            }
        }
    }

    pub fn check_block(&self, x: i32, y: i32, z: i32) -> bool {
        self.registry.check_block(x, y, z)
    }

    pub fn start_terrain(
        &mut self,
        profile: Arc<dyn HeightProfile>,
        radius: i32,
        idle: Duration,
    ) -> Result<(), RuntimeError> {
        if self.terrain.is_some() {
            return Err(RuntimeError::AlreadyRunning("terrain generator"));
        }
        let generator = TerrainGenerator {
            registry: Arc::clone(&self.registry),
            queue: self.queue.clone(),
            profile,
            anchor: self.anchor.clone(),
            radius,
            idle,
            stats: Arc::clone(&self.stats),
        };
        self.terrain = Some(generator.spawn()?);
        Ok(())
    }

    pub fn terrain_running(&self) -> bool {
        self.terrain.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn start_rebuild_workers(&mut self, count: usize) -> Result<(), RuntimeError> {
        if self.workers.is_some() {
            return Err(RuntimeError::AlreadyRunning("rebuild workers"));
        }
        self.workers = Some(RebuildWorkers::spawn(self.rebuild_ctx(), count)?);
        Ok(())
    }

    /// Render-thread buffer pass.
    pub fn publish_buffers(&self) -> PublishReport {
        publish_ready(&self.registry, self.uploader.as_ref(), &self.stats)
    }

    pub fn render_list(&self) -> Vec<PublishedMesh> {
        self.registry.render_list()
    }

    pub fn sweep_all(&self) -> SweepReport {
        sweep_all(&self.rebuild_ctx())
    }

    pub fn sweep_from(&self, start: ChunkCoord) -> SweepReport {
        sweep_from(&self.rebuild_ctx(), start)
    }

    pub fn spawn_sweep_all(&self) -> Result<SweepJob, RuntimeError> {
        spawn_sweep_all(self.rebuild_ctx())
    }

    pub fn spawn_sweep_from(&self, start: ChunkCoord) -> Result<SweepJob, RuntimeError> {
        spawn_sweep_from(self.rebuild_ctx(), start)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.queue.len())
    }

    /// Stops and joins the terrain loop and the rebuild workers. Safe to call twice.
    pub fn shutdown(&mut self) -> Result<(), RuntimeError> {
        let terrain = match self.terrain.take() {
            Some(t) => t.join(),
            None => Ok(()),
        };
        if let Some(w) = self.workers.take() {
            w.join();
        }
        terrain
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!(target: "session", "shutdown: {e}");
        }
    }
}
