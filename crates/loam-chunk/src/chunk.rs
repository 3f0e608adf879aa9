use loam_blocks::{Block, BlockCatalog, BlockId, FaceMask};
use loam_world::{ChunkCoord, Edge, HeightProfile, LocalPos, WorldDims};

use crate::borders::{EdgePlane, NeighborBorders};
use crate::buffer::{BufferHandle, VertexUploader};
use crate::error::ChunkError;
use crate::face::Face;
use crate::mesh::{VERTS_PER_FACE, Vertex, emit_face};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Stale,
    DataFresh,
    Fresh,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// Face masks and vertices rebuilt; carries the vertex count.
    Built(usize),
    /// Nothing visible; the chunk stays stale.
    Empty,
    AlreadyFresh,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BufferOutcome {
    Uploaded { handle: BufferHandle, count: usize },
    AlreadyFresh,
}

/// One column of voxels plus its derived face masks and vertex list.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    dims: WorldDims,
    cells: Vec<Option<Block>>,
    data_fresh: bool,
    buffer_fresh: bool,
    vertices: Vec<Vertex>,
    buffer: Option<BufferHandle>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, dims: WorldDims) -> Self {
        Self {
            coord,
            dims,
            cells: vec![None; dims.cells()],
            data_fresh: false,
            buffer_fresh: false,
            vertices: Vec::new(),
            buffer: None,
        }
    }

    /// Fills every cell from `profile`.
    pub fn populated(coord: ChunkCoord, dims: WorldDims, profile: &dyn HeightProfile) -> Self {
        let mut c = Self::new(coord, dims);
        for y in 0..dims.height {
            for z in 0..dims.side {
                for x in 0..dims.side {
                    let (wx, wy, wz) = dims.world_of(coord, LocalPos::new(x, y, z));
                    if let Some(id) = profile.block_at(wx, wy, wz) {
                        let i = c.idx(x, y, z);
                        c.cells[i] = Some(Block::new(id));
                    }
                }
            }
        }
        c
    }

    #[inline]
    pub fn dims(&self) -> WorldDims {
        self.dims
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.dims.side + z) * self.dims.side + x
    }

    #[inline]
    pub fn get_local(&self, local: LocalPos) -> Option<&Block> {
        self.cells[self.idx(local.x, local.y, local.z)].as_ref()
    }

    #[inline]
    fn solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.cells[self.idx(x, y, z)].is_some()
    }

    /// Places a block; returns what was there. Leaves freshness to the caller.
    pub fn set_local(&mut self, local: LocalPos, id: BlockId) -> Option<Block> {
        let i = self.idx(local.x, local.y, local.z);
        self.cells[i].replace(Block::new(id))
    }

    pub fn take_local(&mut self, local: LocalPos) -> Option<Block> {
        let i = self.idx(local.x, local.y, local.z);
        self.cells[i].take()
    }

    pub fn block_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn state(&self) -> ChunkState {
        match (self.data_fresh, self.buffer_fresh) {
            (false, _) => ChunkState::Stale,
            (true, false) => ChunkState::DataFresh,
            (true, true) => ChunkState::Fresh,
        }
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        !self.data_fresh
    }

    pub fn mark_stale(&mut self) {
        self.data_fresh = false;
        self.buffer_fresh = false;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn buffer(&self) -> Option<BufferHandle> {
        self.buffer
    }

    /// Detaches the uploaded buffer so the caller can release it.
    pub fn take_buffer(&mut self) -> Option<BufferHandle> {
        self.buffer_fresh = false;
        self.buffer.take()
    }

    /// Occupancy of this chunk's cells on `edge`.
    pub fn border(&self, edge: Edge) -> EdgePlane {
        let side = self.dims.side;
        let last = side - 1;
        let mut plane = EdgePlane::new(side, self.dims.height);
        for y in 0..self.dims.height {
            for along in 0..side {
                let (x, z) = match edge {
                    Edge::Front => (along, 0),
                    Edge::Back => (along, last),
                    Edge::Left => (0, along),
                    Edge::Right => (last, along),
                };
                if self.solid(x, y, z) {
                    plane.set(along, y, true);
                }
            }
        }
        plane
    }

    /// Recomputes every block's face mask. Lateral faces on an edge with no
    /// neighbor plane stay exposed.
    pub fn compute_faces(&mut self, borders: &NeighborBorders) {
        let side = self.dims.side as i32;
        let height = self.dims.height as i32;

        // interior
        for y in 0..self.dims.height {
            for z in 0..self.dims.side {
                for x in 0..self.dims.side {
                    let i = self.idx(x, y, z);
                    if self.cells[i].is_none() {
                        continue;
                    }
                    let mut exposed = FaceMask::empty();
                    for face in Face::ALL {
                        let (dx, dy, dz) = face.delta();
                        let nx = x as i32 + dx;
                        let ny = y as i32 + dy;
                        let nz = z as i32 + dz;
                        // floor, ceiling, and lateral edges all count as open here
                        let outside = ny < 0 || ny >= height || nx < 0 || nx >= side || nz < 0 || nz >= side;
                        let open = outside || !self.solid(nx as usize, ny as usize, nz as usize);
                        if open {
                            exposed |= face.mask();
                        }
                    }
                    if let Some(b) = self.cells[i].as_mut() {
                        b.assign_faces(FaceMask::all(), false);
                        b.set_faces(exposed);
                    }
                }
            }
        }

        // boundary
        let last = self.dims.side - 1;
        for edge in Edge::ALL {
            let Some(plane) = borders.get(edge) else {
                continue;
            };
            let mask = Face::from_edge(edge).mask();
            for y in 0..self.dims.height {
                for along in 0..self.dims.side {
                    let (x, z) = match edge {
                        Edge::Front => (along, 0),
                        Edge::Back => (along, last),
                        Edge::Left => (0, along),
                        Edge::Right => (last, along),
                    };
                    let i = self.idx(x, y, z);
                    if let Some(b) = self.cells[i].as_mut() {
                        b.assign_faces(mask, !plane.get(along, y));
                    }
                }
            }
        }
    }

    /// Rebuilds the vertex list from the current face masks.
    pub fn build_vertices(&mut self, catalog: &BlockCatalog) {
        let mut out = std::mem::take(&mut self.vertices);
        out.clear();
        for y in 0..self.dims.height {
            for z in 0..self.dims.side {
                for x in 0..self.dims.side {
                    let Some(block) = self.cells[self.idx(x, y, z)] else {
                        continue;
                    };
                    if block.is_hidden() {
                        continue;
                    }
                    let base = [self.coord.x + x as i32, y as i32, self.coord.z + z as i32];
                    for face in Face::ALL {
                        if !block.test_faces(face.mask()) {
                            continue;
                        }
                        let uv = catalog.uv_rect(block.id, face.role()).unwrap_or_default();
                        emit_face(&mut out, face, base, uv);
                    }
                }
            }
        }
        self.vertices = out;
    }

    /// Stale -> DataFresh. A result with no vertices leaves the chunk stale.
    pub fn rebuild_data(&mut self, borders: &NeighborBorders, catalog: &BlockCatalog) -> RebuildOutcome {
        if self.data_fresh {
            return RebuildOutcome::AlreadyFresh;
        }
        self.compute_faces(borders);
        self.build_vertices(catalog);
        if self.vertices.is_empty() {
            return RebuildOutcome::Empty;
        }
        self.data_fresh = true;
        self.buffer_fresh = false;
        debug_assert_eq!(self.vertices.len() % VERTS_PER_FACE, 0);
        RebuildOutcome::Built(self.vertices.len())
    }

    /// DataFresh -> Fresh. Errors without touching state if data is stale.
    pub fn rebuild_buffer(&mut self, uploader: &dyn VertexUploader) -> Result<BufferOutcome, ChunkError> {
        if !self.data_fresh {
            return Err(ChunkError::BufferBeforeData(self.coord));
        }
        if self.buffer_fresh {
            return Ok(BufferOutcome::AlreadyFresh);
        }
        let handle = uploader.upload(self.coord, self.buffer, &self.vertices);
        self.buffer = Some(handle);
        self.buffer_fresh = true;
        Ok(BufferOutcome::Uploaded {
            handle,
            count: self.vertices.len(),
        })
    }
}
