use bitvec::prelude::*;
use loam_world::Edge;

/// Occupancy of one lateral edge plane of a chunk.
///
/// X-edge planes (left/right) are indexed `y*side + z`, z-edge planes
/// (front/back) `y*side + x`; `along` below is that horizontal coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgePlane {
    side: usize,
    height: usize,
    bits: BitVec,
}

impl EdgePlane {
    pub fn new(side: usize, height: usize) -> Self {
        Self {
            side,
            height,
            bits: bitvec![0; side * height],
        }
    }

    #[inline]
    fn idx(&self, along: usize, y: usize) -> usize {
        y * self.side + along
    }

    #[inline]
    pub fn get(&self, along: usize, y: usize) -> bool {
        along < self.side && y < self.height && self.bits[self.idx(along, y)]
    }

    #[inline]
    pub fn set(&mut self, along: usize, y: usize, solid: bool) {
        let i = self.idx(along, y);
        self.bits.set(i, solid);
    }

    pub fn solid_count(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.side, self.height)
    }
}

/// Edge planes of the lateral neighbors, as seen from the chunk being rebuilt.
/// `None` means no neighbor chunk exists there.
#[derive(Clone, Debug, Default)]
pub struct NeighborBorders {
    planes: [Option<EdgePlane>; 4],
}

impl NeighborBorders {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, edge: Edge) -> Option<&EdgePlane> {
        self.planes[edge.index()].as_ref()
    }

    /// `plane` must be the neighbor's own `edge.opposite()` plane.
    pub fn set(&mut self, edge: Edge, plane: EdgePlane) {
        self.planes[edge.index()] = Some(plane);
    }

    pub fn present(&self) -> usize {
        self.planes.iter().filter(|p| p.is_some()).count()
    }
}
