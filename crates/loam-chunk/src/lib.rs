//! Chunk storage, face visibility, vertex building, and the chunk registry.
#![forbid(unsafe_code)]

pub mod borders;
pub mod buffer;
pub mod chunk;
pub mod edit;
pub mod error;
pub mod face;
pub mod mesh;
pub mod registry;

pub use borders::{EdgePlane, NeighborBorders};
pub use buffer::{BufferHandle, HostBuffers, VertexUploader};
pub use chunk::{BufferOutcome, Chunk, ChunkState, RebuildOutcome};
pub use error::ChunkError;
pub use face::Face;
pub use mesh::{VERTS_PER_FACE, Vertex};
pub use registry::{ChunkCell, ChunkHandle, ChunkRegistry, PublishAttempt, PublishedMesh, RebuildAttempt};
