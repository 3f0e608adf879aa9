use loam_blocks::BlockCatalog;
use loam_chunk::{ChunkRegistry, Face, RebuildAttempt, VERTS_PER_FACE};
use loam_world::WorldDims;
use proptest::prelude::*;

// Positions inside a 2x2 block of 4x4x4 chunks centred on the origin.
fn pos() -> impl Strategy<Value = (i32, i32, i32)> {
    (-4i32..4, 0i32..4, -4i32..4)
}

proptest! {
    // After a full rebuild, a face is exposed exactly when the cell it faces is empty
    #[test]
    fn exposed_iff_facing_empty(
        placed in prop::collection::vec(pos(), 1..40),
        removed in prop::collection::vec(pos(), 0..10),
    ) {
        let cat = BlockCatalog::builtin();
        let stone = cat.require("stone").unwrap();
        let reg = ChunkRegistry::new(WorldDims::new(4, 4).unwrap());
        for &(x, y, z) in &placed {
            reg.add_block(stone, x, y, z).unwrap();
        }
        for &(x, y, z) in &removed {
            let _ = reg.remove_block(x, y, z);
        }

        let mut total = 0;
        for c in reg.coords() {
            match reg.try_rebuild_data(c, &cat) {
                RebuildAttempt::Built(n) => total += n,
                RebuildAttempt::Empty => {}
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }

        let mut exposed_faces = 0;
        for (x, y, z) in (-4..4).flat_map(|x| (0..4).flat_map(move |y| (-4..4).map(move |z| (x, y, z)))) {
            if !reg.check_block(x, y, z) {
                continue;
            }
            let dims = reg.dims();
            let (coord, local) = dims.locate(x, y, z).unwrap();
            let handle = reg.get(coord).unwrap();
            let block = *handle.lock().get_local(local).unwrap();
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let open = !reg.check_block(x + dx, y + dy, z + dz);
                prop_assert_eq!(block.test_faces(face.mask()), open, "{:?} at {:?}", face, (x, y, z));
                if open {
                    exposed_faces += 1;
                }
            }
        }
        prop_assert_eq!(total, exposed_faces * VERTS_PER_FACE);
    }
}
