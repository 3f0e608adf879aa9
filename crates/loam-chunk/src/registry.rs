use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};

use hashbrown::HashMap;
use loam_blocks::BlockCatalog;
use loam_world::{ChunkCoord, Edge, WorldDims};

use crate::borders::NeighborBorders;
use crate::buffer::{BufferHandle, VertexUploader};
use crate::chunk::{BufferOutcome, Chunk, ChunkState, RebuildOutcome};
use crate::error::ChunkError;

/// What the renderer may draw for a chunk: the last uploaded buffer and its
/// vertex count, with `fresh` cleared as soon as the chunk goes stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PublishedMesh {
    pub origin: ChunkCoord,
    pub buffer: Option<BufferHandle>,
    pub vertex_count: usize,
    pub fresh: bool,
}

impl PublishedMesh {
    fn empty(origin: ChunkCoord) -> Self {
        Self {
            origin,
            buffer: None,
            vertex_count: 0,
            fresh: false,
        }
    }

    /// Model translation for this chunk.
    pub fn model_offset(&self) -> [f32; 3] {
        [self.origin.x as f32, 0.0, self.origin.z as f32]
    }
}

/// A registered chunk. Lock order is `chunk` then `published`.
#[derive(Debug)]
pub struct ChunkCell {
    pub origin: ChunkCoord,
    chunk: Mutex<Chunk>,
    published: Mutex<PublishedMesh>,
}

pub type ChunkHandle = Arc<ChunkCell>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RebuildAttempt {
    Built(usize),
    Empty,
    AlreadyFresh,
    /// The chunk or a neighbor was locked elsewhere; retry later.
    Contended,
    Missing,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PublishAttempt {
    Published(usize),
    AlreadyFresh,
    NotReady,
    Contended,
}

fn recover<'a, T>(r: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>) -> MutexGuard<'a, T> {
    r.unwrap_or_else(PoisonError::into_inner)
}

impl ChunkCell {
    fn new(chunk: Chunk) -> Self {
        let origin = chunk.coord;
        Self {
            origin,
            chunk: Mutex::new(chunk),
            published: Mutex::new(PublishedMesh::empty(origin)),
        }
    }

    /// Blocking lock. Recovers from poisoning; a panicked rebuild leaves the
    /// chunk at worst stale.
    pub fn lock(&self) -> MutexGuard<'_, Chunk> {
        recover(self.chunk.lock())
    }

    pub fn try_lock(&self) -> Option<MutexGuard<'_, Chunk>> {
        match self.chunk.try_lock() {
            Ok(g) => Some(g),
            Err(TryLockError::Poisoned(p)) => Some(p.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    pub fn published(&self) -> PublishedMesh {
        *recover(self.published.lock())
    }

    /// Forces the chunk back to `Stale` and withdraws its freshness from the
    /// renderer. The previous buffer stays drawable.
    pub fn mark_stale(&self) {
        let mut chunk = self.lock();
        chunk.mark_stale();
        recover(self.published.lock()).fresh = false;
    }

    pub fn state(&self) -> ChunkState {
        self.lock().state()
    }

    /// Uploads the vertex list if data is fresh and the buffer is not. Never
    /// blocks on the chunk lock.
    pub fn try_publish(&self, uploader: &dyn VertexUploader) -> PublishAttempt {
        let Some(mut chunk) = self.try_lock() else {
            return PublishAttempt::Contended;
        };
        match chunk.state() {
            ChunkState::Stale => return PublishAttempt::NotReady,
            ChunkState::Fresh => return PublishAttempt::AlreadyFresh,
            ChunkState::DataFresh => {}
        }
        match chunk.rebuild_buffer(uploader) {
            Ok(BufferOutcome::Uploaded { handle, count }) => {
                let mut p = recover(self.published.lock());
                p.buffer = Some(handle);
                p.vertex_count = count;
                p.fresh = true;
                PublishAttempt::Published(count)
            }
            Ok(BufferOutcome::AlreadyFresh) => PublishAttempt::AlreadyFresh,
            Err(e) => {
                log::warn!(target: "chunk", "{e}");
                PublishAttempt::NotReady
            }
        }
    }
}

/// Authoritative map from chunk origin to chunk, shared by every worker.
///
/// Registry writers never take a chunk lock; readers may take the registry
/// read lock while holding chunk locks.
pub struct ChunkRegistry {
    dims: WorldDims,
    chunks: RwLock<HashMap<ChunkCoord, ChunkHandle>>,
}

impl ChunkRegistry {
    pub fn new(dims: WorldDims) -> Self {
        Self {
            dims,
            chunks: RwLock::new(HashMap::new()),
        }
    }

    #[inline]
    pub fn dims(&self) -> WorldDims {
        self.dims
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ChunkCoord, ChunkHandle>> {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ChunkCoord, ChunkHandle>> {
        self.chunks.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.read().get(&coord).cloned()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.read().contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Existing chunk at `coord`, or a new empty one. Rejects origins off the grid.
    pub fn get_or_create(&self, coord: ChunkCoord) -> Result<ChunkHandle, ChunkError> {
        let coord = self.dims.chunk_at(coord.x, coord.z)?;
        if let Some(h) = self.get(coord) {
            return Ok(h);
        }
        let mut map = self.write();
        let h = map
            .entry(coord)
            .or_insert_with(|| {
                log::debug!(target: "registry", "create empty chunk ({},{})", coord.x, coord.z);
                Arc::new(ChunkCell::new(Chunk::new(coord, self.dims)))
            })
            .clone();
        Ok(h)
    }

    /// Registers a fully built chunk unless one already exists at its origin.
    /// Returns the new handle on insertion.
    pub fn insert_if_absent(&self, chunk: Chunk) -> Result<Option<ChunkHandle>, ChunkError> {
        let coord = self.dims.chunk_at(chunk.coord.x, chunk.coord.z)?;
        let mut map = self.write();
        if map.contains_key(&coord) {
            return Ok(None);
        }
        let h = Arc::new(ChunkCell::new(chunk));
        map.insert(coord, Arc::clone(&h));
        Ok(Some(h))
    }

    /// Drops the chunk at `coord` and releases its buffer through `uploader`.
    /// Workers still holding the handle see it as missing.
    pub fn remove(&self, coord: ChunkCoord, uploader: &dyn VertexUploader) -> Option<ChunkHandle> {
        let removed = self.write().remove(&coord)?;
        let buffer = removed.lock().take_buffer();
        *recover(removed.published.lock()) = PublishedMesh::empty(coord);
        if let Some(b) = buffer {
            uploader.release(b);
        }
        log::debug!(target: "registry", "removed chunk ({},{}) buffer={:?}", coord.x, coord.z, buffer);
        Some(removed)
    }

    /// Live lateral neighbors in slot order, looked up now.
    pub fn neighbors(&self, coord: ChunkCoord) -> [Option<ChunkHandle>; 4] {
        let side = self.dims.side_i32();
        let map = self.read();
        Edge::ALL.map(|e| map.get(&coord.neighbor(e, side)).cloned())
    }

    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.read().keys().copied().collect()
    }

    pub fn handles(&self) -> Vec<ChunkHandle> {
        self.read().values().cloned().collect()
    }

    /// Last published mesh of every chunk that has one.
    pub fn render_list(&self) -> Vec<PublishedMesh> {
        let handles = self.handles();
        handles
            .iter()
            .map(|h| h.published())
            .filter(|p| p.buffer.is_some() && p.vertex_count > 0)
            .collect()
    }

    /// True if `coord` still maps to exactly `handle`.
    fn is_current(&self, coord: ChunkCoord, handle: &ChunkHandle) -> bool {
        self.read().get(&coord).is_some_and(|h| Arc::ptr_eq(h, handle))
    }

    /// Non-blocking data rebuild of one chunk against its current neighbors.
    ///
    /// Every lock is a `try_lock`; if the chunk or any neighbor is busy the
    /// attempt is abandoned untouched and reported as `Contended`.
    pub fn try_rebuild_data(&self, coord: ChunkCoord, catalog: &BlockCatalog) -> RebuildAttempt {
        let Some(handle) = self.get(coord) else {
            return RebuildAttempt::Missing;
        };
        let Some(mut chunk) = handle.try_lock() else {
            log::trace!(target: "chunk", "contended ({},{})", coord.x, coord.z);
            return RebuildAttempt::Contended;
        };
        if !self.is_current(coord, &handle) {
            log::debug!(target: "chunk", "chunk ({},{}) left the registry", coord.x, coord.z);
            return RebuildAttempt::Missing;
        }
        if !chunk.is_stale() {
            return RebuildAttempt::AlreadyFresh;
        }
        // Looked up under the chunk lock: a neighbor inserted after this point
        // marks us stale once the lock is released.
        let neighbors = self.neighbors(coord);

        let mut borders = NeighborBorders::empty();
        for (edge, slot) in Edge::ALL.into_iter().zip(neighbors.iter()) {
            let Some(n) = slot else { continue };
            let Some(guard) = n.try_lock() else {
                log::trace!(target: "chunk", "neighbor of ({},{}) contended", coord.x, coord.z);
                return RebuildAttempt::Contended;
            };
            if !self.is_current(n.origin, n) {
                if self.contains(n.origin) {
                    // replaced since the lookup
                    return RebuildAttempt::Contended;
                }
                log::debug!(target: "chunk", "stale link ({},{}) -> ({},{})", coord.x, coord.z, n.origin.x, n.origin.z);
                continue;
            }
            borders.set(edge, guard.border(edge.opposite()));
        }

        match chunk.rebuild_data(&borders, catalog) {
            RebuildOutcome::Built(n) => RebuildAttempt::Built(n),
            RebuildOutcome::Empty => {
                // nothing left to draw; the handle stays on the chunk for reuse
                let mut p = recover(handle.published.lock());
                p.vertex_count = 0;
                p.fresh = false;
                RebuildAttempt::Empty
            }
            RebuildOutcome::AlreadyFresh => RebuildAttempt::AlreadyFresh,
        }
    }

    /// Publishes `coord` if it is ready. See `ChunkCell::try_publish`.
    pub fn try_publish(&self, coord: ChunkCoord, uploader: &dyn VertexUploader) -> Option<PublishAttempt> {
        self.get(coord).map(|h| h.try_publish(uploader))
    }
}
