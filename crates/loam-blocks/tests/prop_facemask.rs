use loam_blocks::{Block, BlockId, FaceMask};
use proptest::prelude::*;

fn mask() -> impl Strategy<Value = FaceMask> {
    any::<u8>().prop_map(FaceMask::from_bits_truncate)
}

proptest! {
    #[test]
    fn set_then_test_holds(start in mask(), m in mask()) {
        let mut b = Block::new(BlockId(1));
        b.assign_faces(FaceMask::all(), false);
        b.set_faces(start);
        b.set_faces(m);
        prop_assert!(b.test_faces(m));
        prop_assert!(b.test_faces(start));
    }

    #[test]
    fn clear_only_touches_named_faces(m in mask()) {
        let mut b = Block::new(BlockId(1));
        b.clear_faces(m);
        prop_assert_eq!(b.exposed(), FaceMask::all() - m);
        prop_assert_eq!(b.is_hidden(), m == FaceMask::all());
    }

    #[test]
    fn test_faces_matches_subset(exposed in mask(), query in mask()) {
        let mut b = Block::new(BlockId(0));
        b.assign_faces(FaceMask::all(), false);
        b.set_faces(exposed);
        prop_assert_eq!(b.test_faces(query), exposed.contains(query));
    }
}
