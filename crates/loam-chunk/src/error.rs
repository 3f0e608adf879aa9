use std::fmt;

use loam_world::{ChunkCoord, WorldError};

#[derive(Debug)]
pub enum ChunkError {
    /// `rebuild_buffer` called while the chunk's data is still stale.
    BufferBeforeData(ChunkCoord),
    NoChunk { x: i32, y: i32, z: i32 },
    NoBlock { x: i32, y: i32, z: i32 },
    World(WorldError),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::BufferBeforeData(c) => {
                write!(f, "buffer rebuild before data rebuild for chunk ({}, {})", c.x, c.z)
            }
            ChunkError::NoChunk { x, y, z } => write!(f, "no chunk at ({x}, {y}, {z})"),
            ChunkError::NoBlock { x, y, z } => write!(f, "no block at ({x}, {y}, {z})"),
            ChunkError::World(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ChunkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChunkError::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldError> for ChunkError {
    fn from(e: WorldError) -> Self {
        ChunkError::World(e)
    }
}
