use serde::{Deserialize, Serialize};

/// World-unit origin of a chunk column. Both components are multiples of the
/// chunk side length; y is implicitly 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

/// Lateral chunk edge, in neighbor slot order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// -z
    Front,
    /// +x
    Right,
    /// +z
    Back,
    /// -x
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Front, Edge::Right, Edge::Back, Edge::Left];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Front => Edge::Back,
            Edge::Right => Edge::Left,
            Edge::Back => Edge::Front,
            Edge::Left => Edge::Right,
        }
    }

    /// Unit step in chunk-grid space.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Edge::Front => (0, -1),
            Edge::Right => (1, 0),
            Edge::Back => (0, 1),
            Edge::Left => (-1, 0),
        }
    }
}

impl ChunkCoord {
    /// Caller guarantees alignment; see `WorldDims::chunk_at` for the checked form.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Origin of the chunk containing world column `(wx, wz)`. Rounds toward
    /// negative infinity so `-1` lands in the chunk at `-side`.
    #[inline]
    pub fn containing(wx: i32, wz: i32, side: i32) -> Self {
        Self {
            x: wx.div_euclid(side) * side,
            z: wz.div_euclid(side) * side,
        }
    }

    #[inline]
    pub fn is_aligned(self, side: i32) -> bool {
        self.x.rem_euclid(side) == 0 && self.z.rem_euclid(side) == 0
    }

    /// Chunk-grid index (origin divided by side).
    #[inline]
    pub fn grid(self, side: i32) -> (i32, i32) {
        (self.x.div_euclid(side), self.z.div_euclid(side))
    }

    #[inline]
    pub fn from_grid(gx: i32, gz: i32, side: i32) -> Self {
        Self {
            x: gx * side,
            z: gz * side,
        }
    }

    #[inline]
    pub fn neighbor(self, edge: Edge, side: i32) -> Self {
        let (dx, dz) = edge.delta();
        Self {
            x: self.x + dx * side,
            z: self.z + dz * side,
        }
    }

    /// The four lateral neighbors in slot order.
    pub fn neighbors(self, side: i32) -> [ChunkCoord; 4] {
        Edge::ALL.map(|e| self.neighbor(e, side))
    }

    /// Squared distance in chunk-grid units.
    #[inline]
    pub fn grid_distance_sq(self, other: ChunkCoord, side: i32) -> i64 {
        let (ax, az) = self.grid(side);
        let (bx, bz) = other.grid(side);
        let dx = i64::from(ax - bx);
        let dz = i64::from(az - bz);
        dx * dx + dz * dz
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.x, value.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_positions_floor() {
        assert_eq!(ChunkCoord::containing(-1, -1, 8), ChunkCoord::new(-8, -8));
        assert_eq!(ChunkCoord::containing(-8, 7, 8), ChunkCoord::new(-8, 0));
        assert_eq!(ChunkCoord::containing(-9, 8, 8), ChunkCoord::new(-16, 8));
    }

    #[test]
    fn neighbors_follow_slot_order() {
        let c = ChunkCoord::new(8, -16);
        assert_eq!(
            c.neighbors(8),
            [
                ChunkCoord::new(8, -24),
                ChunkCoord::new(16, -16),
                ChunkCoord::new(8, -8),
                ChunkCoord::new(0, -16),
            ]
        );
        for e in Edge::ALL {
            assert_eq!(c.neighbor(e, 8).neighbor(e.opposite(), 8), c);
        }
    }

    #[test]
    fn alignment() {
        assert!(ChunkCoord::new(-16, 24).is_aligned(8));
        assert!(!ChunkCoord::new(-4, 0).is_aligned(8));
        assert_eq!(ChunkCoord::new(-16, 24).grid(8), (-2, 3));
        assert_eq!(ChunkCoord::from_grid(-2, 3, 8), ChunkCoord::new(-16, 24));
    }

    #[test]
    fn grid_distance_ignores_side() {
        let a = ChunkCoord::new(0, 0);
        let b = ChunkCoord::new(16, -8);
        assert_eq!(a.grid_distance_sq(b, 8), 5);
    }
}
