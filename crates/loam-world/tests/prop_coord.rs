use loam_world::{ChunkCoord, WorldDims};
use proptest::prelude::*;

proptest! {
    #[test]
    fn containing_is_aligned_and_covers(wx in -10_000i32..10_000, wz in -10_000i32..10_000, side in 2i32..33) {
        let c = ChunkCoord::containing(wx, wz, side);
        prop_assert!(c.is_aligned(side));
        prop_assert!(c.x <= wx && wx < c.x + side);
        prop_assert!(c.z <= wz && wz < c.z + side);
    }

    #[test]
    fn locate_round_trips(wx in -10_000i32..10_000, wy in 0i32..32, wz in -10_000i32..10_000) {
        let dims = WorldDims::default();
        let (c, l) = dims.locate(wx, wy, wz).unwrap();
        prop_assert!(l.x < dims.side && l.z < dims.side);
        prop_assert_eq!(dims.world_of(c, l), (wx, wy, wz));
    }

    #[test]
    fn edges_touched_means_neighbor_cell_is_elsewhere(x in 0usize..8, z in 0usize..8) {
        let dims = WorldDims::default();
        let home = ChunkCoord::new(0, 0);
        let local = loam_world::LocalPos::new(x, 0, z);
        for edge in dims.edges_touched(local) {
            let (dx, dz) = edge.delta();
            let (wx, _, wz) = dims.world_of(home, local);
            let other = dims.containing(wx + dx, wz + dz);
            prop_assert_eq!(other, home.neighbor(edge, dims.side_i32()));
        }
    }
}
