use bitflags::bitflags;

bitflags! {
    /// One bit per cube face; a set bit means the face borders empty space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const FRONT = 1 << 2;
        const BACK = 1 << 3;
        const RIGHT = 1 << 4;
        const LEFT = 1 << 5;
    }
}

impl Default for FaceMask {
    fn default() -> Self {
        FaceMask::empty()
    }
}

/// Index into a `BlockCatalog`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct BlockId(pub u16);

/// Which texture of a block a face samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl FaceRole {
    pub const ALL: [FaceRole; 6] = [
        FaceRole::Top,
        FaceRole::Bottom,
        FaceRole::Left,
        FaceRole::Right,
        FaceRole::Front,
        FaceRole::Back,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-voxel state: identity plus the derived exposed-face mask.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Block {
    pub id: BlockId,
    exposed: FaceMask,
}

impl Block {
    /// New blocks start fully exposed until a face pass proves otherwise.
    #[inline]
    pub const fn new(id: BlockId) -> Self {
        Self {
            id,
            exposed: FaceMask::all(),
        }
    }

    #[inline]
    pub fn set_faces(&mut self, mask: FaceMask) {
        self.exposed.insert(mask);
    }

    #[inline]
    pub fn clear_faces(&mut self, mask: FaceMask) {
        self.exposed.remove(mask);
    }

    #[inline]
    pub fn assign_faces(&mut self, mask: FaceMask, exposed: bool) {
        self.exposed.set(mask, exposed);
    }

    /// True only when every face in `mask` is exposed.
    #[inline]
    pub fn test_faces(&self, mask: FaceMask) -> bool {
        self.exposed.contains(mask)
    }

    #[inline]
    pub fn exposed(&self) -> FaceMask {
        self.exposed
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.exposed.is_empty()
    }
}
