use std::sync::{Arc, PoisonError, RwLock};

use loam_world::{ChunkCoord, WorldDims};

/// Camera position shared between the render side (writer) and the terrain
/// loop (reader).
#[derive(Clone, Debug, Default)]
pub struct ViewAnchor(Arc<RwLock<[f32; 3]>>);

impl ViewAnchor {
    pub fn new(pos: [f32; 3]) -> Self {
        Self(Arc::new(RwLock::new(pos)))
    }

    pub fn set(&self, pos: [f32; 3]) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = pos;
    }

    pub fn get(&self) -> [f32; 3] {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Chunk containing the anchor's column.
    pub fn chunk(&self, dims: WorldDims) -> ChunkCoord {
        let [x, _, z] = self.get();
        dims.containing(x.floor() as i32, z.floor() as i32)
    }
}
