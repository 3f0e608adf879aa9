use serde::Deserialize;

use crate::WorldError;
use crate::coord::{ChunkCoord, Edge};

pub const CHUNK_SIDE: usize = 8;
pub const WORLD_HEIGHT: usize = 32;

/// Chunk footprint and world height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldDims {
    pub side: usize,
    pub height: usize,
}

impl Default for WorldDims {
    fn default() -> Self {
        Self {
            side: CHUNK_SIDE,
            height: WORLD_HEIGHT,
        }
    }
}

/// Cell position inside one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl LocalPos {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

impl WorldDims {
    pub fn new(side: usize, height: usize) -> Result<Self, WorldError> {
        let dims = Self { side, height };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.side < 2 || self.height == 0 || self.side > i32::MAX as usize / 2 {
            return Err(WorldError::InvalidDims {
                side: self.side,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn side_i32(&self) -> i32 {
        self.side as i32
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.side * self.side * self.height
    }

    #[inline]
    pub fn contains_y(&self, wy: i32) -> bool {
        wy >= 0 && (wy as usize) < self.height
    }

    /// Checked chunk origin; rejects coordinates off the chunk grid.
    pub fn chunk_at(&self, x: i32, z: i32) -> Result<ChunkCoord, WorldError> {
        let c = ChunkCoord::new(x, z);
        if !c.is_aligned(self.side_i32()) {
            return Err(WorldError::Misaligned {
                x,
                z,
                side: self.side,
            });
        }
        Ok(c)
    }

    #[inline]
    pub fn containing(&self, wx: i32, wz: i32) -> ChunkCoord {
        ChunkCoord::containing(wx, wz, self.side_i32())
    }

    /// Splits a world position into its chunk and local cell.
    pub fn locate(&self, wx: i32, wy: i32, wz: i32) -> Result<(ChunkCoord, LocalPos), WorldError> {
        if !self.contains_y(wy) {
            return Err(WorldError::HeightOutOfRange {
                y: wy,
                height: self.height,
            });
        }
        let side = self.side_i32();
        let coord = ChunkCoord::containing(wx, wz, side);
        let local = LocalPos::new(
            wx.rem_euclid(side) as usize,
            wy as usize,
            wz.rem_euclid(side) as usize,
        );
        Ok((coord, local))
    }

    #[inline]
    pub fn world_of(&self, coord: ChunkCoord, local: LocalPos) -> (i32, i32, i32) {
        (
            coord.x + local.x as i32,
            local.y as i32,
            coord.z + local.z as i32,
        )
    }

    /// Lateral edges a local cell sits on. A corner cell touches two.
    pub fn edges_touched(&self, local: LocalPos) -> Vec<Edge> {
        let last = self.side - 1;
        let mut out = Vec::with_capacity(2);
        if local.z == 0 {
            out.push(Edge::Front);
        }
        if local.x == last {
            out.push(Edge::Right);
        }
        if local.z == last {
            out.push(Edge::Back);
        }
        if local.x == 0 {
            out.push(Edge::Left);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_eight_by_thirty_two() {
        let d = WorldDims::default();
        assert_eq!((d.side, d.height), (8, 32));
        assert!(d.validate().is_ok());
        assert!(WorldDims::new(1, 32).is_err());
        assert!(WorldDims::new(8, 0).is_err());
    }

    #[test]
    fn locate_splits_negative_positions() {
        let d = WorldDims::default();
        let (c, l) = d.locate(-1, 3, -9).unwrap();
        assert_eq!(c, ChunkCoord::new(-8, -16));
        assert_eq!(l, LocalPos::new(7, 3, 7));
        assert_eq!(d.world_of(c, l), (-1, 3, -9));
    }

    #[test]
    fn locate_rejects_height() {
        let d = WorldDims::default();
        assert!(matches!(
            d.locate(0, -1, 0),
            Err(WorldError::HeightOutOfRange { y: -1, .. })
        ));
        assert!(d.locate(0, 32, 0).is_err());
        assert!(d.locate(0, 31, 0).is_ok());
    }

    #[test]
    fn chunk_at_checks_alignment() {
        let d = WorldDims::default();
        assert_eq!(d.chunk_at(-8, 16).unwrap(), ChunkCoord::new(-8, 16));
        assert!(matches!(
            d.chunk_at(3, 0),
            Err(WorldError::Misaligned { x: 3, z: 0, side: 8 })
        ));
    }

    #[test]
    fn edges_touched_by_corner_and_interior() {
        let d = WorldDims::default();
        assert_eq!(d.edges_touched(LocalPos::new(0, 0, 0)), vec![Edge::Front, Edge::Left]);
        assert_eq!(d.edges_touched(LocalPos::new(7, 5, 7)), vec![Edge::Right, Edge::Back]);
        assert!(d.edges_touched(LocalPos::new(3, 0, 4)).is_empty());
    }
}
