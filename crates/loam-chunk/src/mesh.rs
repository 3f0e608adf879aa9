use loam_blocks::UvRect;

use crate::face::Face;

/// World-space position plus atlas texture coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

pub const VERTS_PER_FACE: usize = 6;

/// Appends one face of the cube whose minimum corner is `base`.
#[inline]
pub(crate) fn emit_face(out: &mut Vec<Vertex>, face: Face, base: [i32; 3], uv: UvRect) {
    let bx = base[0] as f32;
    let by = base[1] as f32;
    let bz = base[2] as f32;
    for t in face.template() {
        out.push(Vertex {
            pos: [bx + t.pos[0], by + t.pos[1], bz + t.pos[2]],
            uv: uv.lerp(t.uv[0], t.uv[1]),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_is_translated_and_textured() {
        let mut out = Vec::new();
        let uv = UvRect { u0: 0.5, v0: 0.25, u1: 0.75, v1: 0.5 };
        emit_face(&mut out, Face::Top, [-8, 3, 16], uv);
        assert_eq!(out.len(), VERTS_PER_FACE);
        for v in &out {
            assert_eq!(v.pos[1], 4.0);
            assert!((-8.0..=-7.0).contains(&v.pos[0]));
            assert!((16.0..=17.0).contains(&v.pos[2]));
            assert!((0.5..=0.75).contains(&v.uv[0]));
            assert!((0.25..=0.5).contains(&v.uv[1]));
        }
    }
}
