use jigsaw_core::{Board, BoardConfig, EdgeKind, ImageInfo, Topology};

#[test]
fn neighbouring_edges_interlock() {
    for seed in [1u32, 7, 0xDEAD_BEEF, jigsaw_core::game::PUZZLE_SEED] {
        let topology = Topology::generate(5, seed, 0.02);
        for row in 0..5 {
            for col in 0..5 {
                let cell = topology.cell(col, row).expect("cell");
                if col + 1 < 5 {
                    let right = topology.cell(col + 1, row).expect("right neighbour");
                    assert_eq!(cell.right(), -right.left());
                    assert!(!cell.right().is_flat());
                } else {
                    assert_eq!(cell.right(), EdgeKind::Flat);
                }
                if row + 1 < 5 {
                    let below = topology.cell(col, row + 1).expect("neighbour below");
                    assert_eq!(cell.bottom(), -below.top());
                    assert!(!cell.bottom().is_flat());
                } else {
                    assert_eq!(cell.bottom(), EdgeKind::Flat);
                }
                if col == 0 {
                    assert_eq!(cell.left(), EdgeKind::Flat);
                }
                if row == 0 {
                    assert_eq!(cell.top(), EdgeKind::Flat);
                }
            }
        }
    }
}

#[test]
fn same_seed_same_shapes() {
    let config = BoardConfig::new(16, 400.0, 400.0).with_seed(42);
    let a = Board::new(ImageInfo::new(800, 800), config.clone()).expect("board");
    let b = Board::new(ImageInfo::new(800, 800), config).expect("board");
    for (left, right) in a.pieces().iter().zip(b.pieces()) {
        assert_eq!(left.outline.to_svg_path(), right.outline.to_svg_path());
        assert_eq!(left.current_position, right.current_position);
    }
}

#[test]
fn single_piece_is_all_flat() {
    let topology = Topology::generate(1, 3, 0.02);
    let cell = topology.cell(0, 0).expect("cell");
    assert!(cell.kinds.iter().all(|kind| kind.is_flat()));
}
