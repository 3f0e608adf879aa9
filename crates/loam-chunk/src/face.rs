use loam_blocks::{FaceMask, FaceRole};
use loam_world::Edge;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Top = 0,
    Bottom = 1,
    Front = 2,
    Back = 3,
    Right = 4,
    Left = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Right,
        Face::Left,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn mask(self) -> FaceMask {
        match self {
            Face::Top => FaceMask::TOP,
            Face::Bottom => FaceMask::BOTTOM,
            Face::Front => FaceMask::FRONT,
            Face::Back => FaceMask::BACK,
            Face::Right => FaceMask::RIGHT,
            Face::Left => FaceMask::LEFT,
        }
    }

    /// Grid step `(dx,dy,dz)` out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Front => (0, 0, -1),
            Face::Back => (0, 0, 1),
            Face::Right => (1, 0, 0),
            Face::Left => (-1, 0, 0),
        }
    }

    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::Top => FaceRole::Top,
            Face::Bottom => FaceRole::Bottom,
            Face::Front => FaceRole::Front,
            Face::Back => FaceRole::Back,
            Face::Right => FaceRole::Right,
            Face::Left => FaceRole::Left,
        }
    }

    /// Lateral faces point across a chunk edge; top and bottom never do.
    #[inline]
    pub fn edge(self) -> Option<Edge> {
        match self {
            Face::Front => Some(Edge::Front),
            Face::Back => Some(Edge::Back),
            Face::Right => Some(Edge::Right),
            Face::Left => Some(Edge::Left),
            Face::Top | Face::Bottom => None,
        }
    }

    #[inline]
    pub fn from_edge(edge: Edge) -> Face {
        match edge {
            Edge::Front => Face::Front,
            Edge::Right => Face::Right,
            Edge::Back => Face::Back,
            Edge::Left => Face::Left,
        }
    }

    #[inline]
    pub fn template(self) -> &'static [TemplateVertex; 6] {
        &FACE_TEMPLATES[self.index()]
    }
}

/// Unit-cube corner plus its tile-local texture coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TemplateVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

const fn tv(pos: [f32; 3], uv: [f32; 2]) -> TemplateVertex {
    TemplateVertex { pos, uv }
}

// Quad corners counter-clockwise seen from outside, v=0 at the top of the tile.
const BL: [f32; 2] = [0.0, 1.0];
const BR: [f32; 2] = [1.0, 1.0];
const TR: [f32; 2] = [1.0, 0.0];
const TL: [f32; 2] = [0.0, 0.0];

const fn quad(a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) -> [TemplateVertex; 6] {
    [
        tv(a, BL),
        tv(b, BR),
        tv(c, TR),
        tv(a, BL),
        tv(c, TR),
        tv(d, TL),
    ]
}

/// Two triangles per face, indexed by `Face::index()`.
pub static FACE_TEMPLATES: [[TemplateVertex; 6]; 6] = [
    // top
    quad([0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]),
    // bottom
    quad([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
    // front
    quad([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]),
    // back
    quad([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]),
    // right
    quad([1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
    // left
    quad([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    #[test]
    fn templates_lie_on_their_face_plane() {
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let axis = if dx != 0 { 0 } else if dy != 0 { 1 } else { 2 };
            let plane = if dx + dy + dz > 0 { 1.0 } else { 0.0 };
            for v in face.template() {
                assert_eq!(v.pos[axis], plane, "{face:?}");
            }
        }
    }

    #[test]
    fn triangles_wind_outward() {
        for face in Face::ALL {
            let (dx, dy, dz) = face.delta();
            let t = face.template();
            for tri in t.chunks(3) {
                let n = cross(sub(tri[1].pos, tri[0].pos), sub(tri[2].pos, tri[0].pos));
                let dot = n[0] * dx as f32 + n[1] * dy as f32 + n[2] * dz as f32;
                assert!(dot > 0.0, "{face:?} winds inward");
            }
        }
    }

    #[test]
    fn lateral_faces_map_to_edges() {
        for edge in Edge::ALL {
            assert_eq!(Face::from_edge(edge).edge(), Some(edge));
        }
        assert_eq!(Face::Top.edge(), None);
        assert_eq!(Face::Left.mask(), FaceMask::LEFT);
    }
}
