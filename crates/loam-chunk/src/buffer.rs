use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use loam_world::ChunkCoord;

use crate::mesh::Vertex;

/// Opaque id of an uploaded vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Moves a finished vertex list somewhere the renderer can draw it from.
/// `prev` is the chunk's previous handle, which implementations may reuse.
pub trait VertexUploader: Send + Sync {
    fn upload(&self, origin: ChunkCoord, prev: Option<BufferHandle>, vertices: &[Vertex]) -> BufferHandle;

    /// Frees a buffer whose chunk is gone. The handle is not used again.
    fn release(&self, handle: BufferHandle);
}

/// In-memory uploader keyed by handle.
#[derive(Default)]
pub struct HostBuffers {
    buffers: Mutex<HashMap<BufferHandle, Vec<Vertex>>>,
    next: AtomicU32,
    uploads: AtomicUsize,
}

impl HostBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self, handle: BufferHandle) -> Option<usize> {
        let map = self.buffers.lock().unwrap();
        map.get(&handle).map(|v| v.len())
    }

    pub fn vertices(&self, handle: BufferHandle) -> Option<Vec<Vertex>> {
        let map = self.buffers.lock().unwrap();
        map.get(&handle).cloned()
    }

    pub fn len(&self) -> usize {
        self.buffers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total upload calls, including re-uploads into an existing handle.
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::Relaxed)
    }
}

impl VertexUploader for HostBuffers {
    fn upload(&self, origin: ChunkCoord, prev: Option<BufferHandle>, vertices: &[Vertex]) -> BufferHandle {
        let handle = prev.unwrap_or_else(|| BufferHandle(self.next.fetch_add(1, Ordering::Relaxed)));
        let mut map = self.buffers.lock().unwrap();
        map.insert(handle, vertices.to_vec());
        self.uploads.fetch_add(1, Ordering::Relaxed);
        log::trace!(target: "chunk", "upload ({},{}) -> {:?} verts={}", origin.x, origin.z, handle, vertices.len());
        handle
    }

    fn release(&self, handle: BufferHandle) {
        if self.buffers.lock().unwrap().remove(&handle).is_none() {
            log::debug!(target: "chunk", "release of unknown buffer {:?}", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32) -> Vertex {
        Vertex {
            pos: [x, 0.0, 0.0],
            uv: [0.0, 0.0],
        }
    }

    #[test]
    fn reuses_previous_handle() {
        let host = HostBuffers::new();
        let o = ChunkCoord::new(0, 0);
        let a = host.upload(o, None, &[v(1.0), v(2.0)]);
        let b = host.upload(o, Some(a), &[v(3.0)]);
        assert_eq!(a, b);
        assert_eq!(host.vertex_count(a), Some(1));
        assert_eq!(host.len(), 1);
        assert_eq!(host.uploads(), 2);
    }

    #[test]
    fn fresh_uploads_get_distinct_handles() {
        let host = HostBuffers::new();
        let a = host.upload(ChunkCoord::new(0, 0), None, &[v(1.0)]);
        let b = host.upload(ChunkCoord::new(8, 0), None, &[v(1.0)]);
        assert_ne!(a, b);
        host.release(a);
        assert_eq!(host.vertices(a), None);
        assert_eq!(host.len(), 1);
        assert_eq!(host.vertices(b).map(|v| v.len()), Some(1));
    }
}
