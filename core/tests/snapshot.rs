use jigsaw_core::snapshot::{records_from_json, records_to_json};
use jigsaw_core::{Board, BoardConfig, ImageInfo, PieceRecord, SavedPuzzle};

fn board() -> Board {
    Board::new(ImageInfo::new(640, 480), BoardConfig::new(9, 600.0, 450.0)).expect("board")
}

fn played_board() -> Board {
    let mut board = board();
    board.lock_in_place(4);
    board.lock_in_place(0);
    board.set_position(7, (123.5, 88.25));
    board.bring_to_front(7);
    board.bring_to_front(2);
    board
}

fn state(board: &Board) -> Vec<((f32, f32), bool)> {
    board
        .pieces()
        .iter()
        .map(|piece| (piece.current_position, piece.locked))
        .collect()
}

#[test]
fn export_then_import_reproduces_the_board() {
    let source = played_board();
    let records = source.export_snapshot();

    let mut restored = board();
    restored.shuffle();
    let report = restored.import_snapshot(&records);

    assert_eq!(report.applied, 9);
    assert_eq!(report.skipped, 0);
    assert_eq!(state(&restored), state(&source));
    assert_eq!(restored.paint_order(), source.paint_order());
    assert_eq!(restored.export_snapshot(), records);
}

#[test]
fn import_is_idempotent() {
    let records = played_board().export_snapshot();
    let mut restored = board();
    restored.import_snapshot(&records);
    let once = (state(&restored), restored.paint_order().clone());
    restored.import_snapshot(&records);
    assert_eq!((state(&restored), restored.paint_order().clone()), once);
}

#[test]
fn records_survive_json() {
    let records = played_board().export_snapshot();
    let json = records_to_json(&records);
    assert_eq!(records_from_json(&json).expect("json"), records);
}

#[test]
fn saved_puzzle_round_trips_through_bytes() {
    let source = played_board();
    let saved = source.to_saved();
    let bytes = saved.to_bytes().expect("encode");
    let decoded = SavedPuzzle::from_bytes(&bytes).expect("decode");
    assert_eq!(decoded, saved);
    assert!(board().matches_saved(&decoded));

    let other = Board::new(ImageInfo::new(640, 480), BoardConfig::new(16, 600.0, 450.0))
        .expect("board");
    assert!(!other.matches_saved(&decoded));
}

#[test]
fn partial_records_leave_other_pieces_alone() {
    let mut restored = board();
    let before = state(&restored);
    restored.import_snapshot(&[PieceRecord {
        id: "2-2".to_string(),
        x: 10.0,
        y: 20.0,
        locked: false,
    }]);
    let after = state(&restored);
    assert_eq!(after[8], ((10.0, 20.0), false));
    assert_eq!(after[..8], before[..8]);
    assert_eq!(restored.paint_order().top(), Some(8));
}
