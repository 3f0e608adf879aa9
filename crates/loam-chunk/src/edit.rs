//! Block placement, removal, and existence queries in world coordinates.

use loam_blocks::BlockId;
use loam_world::{ChunkCoord, LocalPos};

use crate::error::ChunkError;
use crate::registry::ChunkRegistry;

impl ChunkRegistry {
    /// Places `id` at a world position, creating the owning chunk if needed.
    /// Returns every chunk that went stale.
    pub fn add_block(&self, id: BlockId, wx: i32, wy: i32, wz: i32) -> Result<Vec<ChunkCoord>, ChunkError> {
        let (coord, local) = self.dims().locate(wx, wy, wz)?;
        let handle = self.get_or_create(coord)?;
        handle.lock().set_local(local, id);
        handle.mark_stale();
        log::debug!(target: "chunk", "add {:?} at ({wx},{wy},{wz})", id);
        Ok(self.stale_edges(coord, local))
    }

    /// Removes the block at a world position. Errors if no chunk or no block is there.
    pub fn remove_block(&self, wx: i32, wy: i32, wz: i32) -> Result<Vec<ChunkCoord>, ChunkError> {
        let (coord, local) = self.dims().locate(wx, wy, wz)?;
        let Some(handle) = self.get(coord) else {
            return Err(ChunkError::NoChunk { x: wx, y: wy, z: wz });
        };
        if handle.lock().take_local(local).is_none() {
            return Err(ChunkError::NoBlock { x: wx, y: wy, z: wz });
        }
        handle.mark_stale();
        log::debug!(target: "chunk", "remove at ({wx},{wy},{wz})");
        Ok(self.stale_edges(coord, local))
    }

    /// Never creates a chunk.
    pub fn check_block(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let Ok((coord, local)) = self.dims().locate(wx, wy, wz) else {
            return false;
        };
        match self.get(coord) {
            Some(h) => h.lock().get_local(local).is_some(),
            None => false,
        }
    }

    /// Marks existing lateral neighbors touched by `local` stale. Returns
    /// `coord` followed by each of them.
    fn stale_edges(&self, coord: ChunkCoord, local: LocalPos) -> Vec<ChunkCoord> {
        let dims = self.dims();
        let mut affected = vec![coord];
        for edge in dims.edges_touched(local) {
            let n = coord.neighbor(edge, dims.side_i32());
            if let Some(h) = self.get(n) {
                h.mark_stale();
                affected.push(n);
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::HostBuffers;
    use crate::chunk::ChunkState;
    use crate::registry::{PublishAttempt, RebuildAttempt};
    use loam_blocks::{BlockCatalog, FaceMask};
    use loam_world::{WorldDims, WorldError};
    use std::thread;

    fn setup() -> (ChunkRegistry, BlockCatalog) {
        (ChunkRegistry::new(WorldDims::default()), BlockCatalog::builtin())
    }

    fn rebuild_all(r: &ChunkRegistry, cat: &BlockCatalog) {
        for c in r.coords() {
            r.try_rebuild_data(c, cat);
        }
    }

    #[test]
    fn add_rejects_out_of_range_height() {
        let (r, cat) = setup();
        let stone = cat.require("stone").unwrap();
        assert!(matches!(
            r.add_block(stone, 0, 32, 0),
            Err(ChunkError::World(WorldError::HeightOutOfRange { .. }))
        ));
        assert!(r.add_block(stone, 0, -1, 0).is_err());
        assert!(r.is_empty());
    }

    #[test]
    fn add_creates_owning_chunk() {
        let (r, cat) = setup();
        let affected = r.add_block(cat.require("dirt").unwrap(), -1, 5, -1).unwrap();
        assert_eq!(affected, vec![ChunkCoord::new(-8, -8)]);
        assert!(r.contains(ChunkCoord::new(-8, -8)));
        assert!(r.check_block(-1, 5, -1));
        assert!(!r.check_block(-1, 6, -1));
    }

    #[test]
    fn check_block_never_creates() {
        let (r, _) = setup();
        assert!(!r.check_block(100, 3, -100));
        assert!(!r.check_block(0, 99, 0));
        assert!(r.is_empty());
    }

    #[test]
    fn remove_reports_missing_chunk_and_block() {
        let (r, cat) = setup();
        assert!(matches!(r.remove_block(0, 0, 0), Err(ChunkError::NoChunk { .. })));
        r.add_block(cat.require("stone").unwrap(), 0, 0, 0).unwrap();
        assert!(matches!(r.remove_block(1, 0, 0), Err(ChunkError::NoBlock { .. })));
        assert!(r.remove_block(0, 0, 0).is_ok());
        assert!(!r.check_block(0, 0, 0));
    }

    #[test]
    fn edge_removal_marks_left_neighbor_stale() {
        let (r, cat) = setup();
        let stone = cat.require("stone").unwrap();
        let host = HostBuffers::new();
        r.add_block(stone, -1, 0, 3).unwrap();
        r.add_block(stone, 0, 0, 3).unwrap();
        rebuild_all(&r, &cat);
        for h in r.handles() {
            h.try_publish(&host);
            assert_eq!(h.state(), ChunkState::Fresh);
        }

        let affected = r.remove_block(0, 0, 3).unwrap();
        assert_eq!(affected, vec![ChunkCoord::new(0, 0), ChunkCoord::new(-8, 0)]);
        assert_eq!(r.get(ChunkCoord::new(-8, 0)).unwrap().state(), ChunkState::Stale);
        assert!(!r.get(ChunkCoord::new(-8, 0)).unwrap().published().fresh);
    }

    #[test]
    fn edge_edit_does_not_create_neighbor() {
        let (r, cat) = setup();
        let affected = r.add_block(cat.require("stone").unwrap(), 7, 0, 0).unwrap();
        assert_eq!(affected, vec![ChunkCoord::new(0, 0)]);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn faces_hide_across_chunk_boundary() {
        let (r, cat) = setup();
        let stone = cat.require("stone").unwrap();
        r.add_block(stone, -1, 0, 0).unwrap();
        r.add_block(stone, 0, 0, 0).unwrap();
        let mut total = 0;
        for c in r.coords() {
            match r.try_rebuild_data(c, &cat) {
                RebuildAttempt::Built(n) => {
                    assert_eq!(n, 30);
                    total += n;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn emptied_chunk_leaves_the_render_list() {
        let (r, cat) = setup();
        let host = HostBuffers::new();
        let dirt = cat.require("dirt").unwrap();
        let c = ChunkCoord::new(0, 0);
        r.add_block(dirt, 3, 3, 3).unwrap();
        r.try_rebuild_data(c, &cat);
        assert_eq!(r.try_publish(c, &host), Some(PublishAttempt::Published(36)));
        let before = r.render_list();
        assert_eq!(before.len(), 1);

        r.remove_block(3, 3, 3).unwrap();
        assert_eq!(r.try_rebuild_data(c, &cat), RebuildAttempt::Empty);
        assert!(r.render_list().is_empty());
        let h = r.get(c).unwrap();
        assert_eq!(h.published().vertex_count, 0);
        assert_eq!(h.state(), ChunkState::Stale);

        // refilling reuses the same buffer
        r.add_block(dirt, 3, 3, 3).unwrap();
        r.try_rebuild_data(c, &cat);
        assert_eq!(r.try_publish(c, &host), Some(PublishAttempt::Published(36)));
        assert_eq!(r.render_list()[0].buffer, before[0].buffer);
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn neighbor_created_during_rebuild_restales_the_chunk() {
        let cat = BlockCatalog::builtin();
        let stone = cat.require("stone").unwrap();
        let a = ChunkCoord::new(0, 0);
        for _ in 0..200 {
            let r = ChunkRegistry::new(WorldDims::default());
            r.add_block(stone, 7, 0, 0).unwrap();
            thread::scope(|s| {
                s.spawn(|| {
                    while r.try_rebuild_data(a, &cat) == RebuildAttempt::Contended {
                        thread::yield_now();
                    }
                });
                r.add_block(stone, 8, 0, 0).unwrap();
            });
            // the requeued rebuild after the edit
            r.try_rebuild_data(a, &cat);
            let h = r.get(a).unwrap();
            let right = h.lock().get_local(LocalPos::new(7, 0, 0)).map(|b| b.test_faces(FaceMask::RIGHT));
            assert_eq!(right, Some(false));
            assert_ne!(h.state(), ChunkState::Stale);
        }
    }
}
