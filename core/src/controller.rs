use crate::board::Board;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragState {
    pub piece: usize,
    /// Pointer position minus the piece's top-left corner at pick-up.
    pub offset: (f32, f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragState),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Dropped within snap distance; the piece is now locked in place.
    Snapped { piece: usize },
    /// Left where it was dropped, still unlocked.
    Dropped { piece: usize },
}

impl Release {
    pub fn piece(&self) -> usize {
        match *self {
            Release::Snapped { piece } | Release::Dropped { piece } => piece,
        }
    }
}

/// Pointer state machine over a board. At most one piece has drag focus, and
/// it is always unlocked.
#[derive(Clone, Copy, Debug, Default)]
pub struct InteractionController {
    phase: DragPhase,
    gated: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn selected(&self) -> Option<usize> {
        match self.phase {
            DragPhase::Dragging(drag) => Some(drag.piece),
            DragPhase::Idle => None,
        }
    }

    /// Stops accepting pointer-down. Used once the board is solved and on
    /// teardown.
    pub fn gate(&mut self) {
        self.gated = true;
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    /// Idle -> Dragging when the pointer lands on an unlocked piece. Returns the
    /// picked piece.
    pub fn pointer_down(&mut self, board: &mut Board, x: f32, y: f32) -> Option<usize> {
        if self.gated || self.is_dragging() {
            return None;
        }
        let piece = board.piece_at(x, y)?;
        let (px, py) = board.piece(piece)?.current_position;
        board.bring_to_front(piece);
        self.phase = DragPhase::Dragging(DragState {
            piece,
            offset: (x - px, y - py),
        });
        Some(piece)
    }

    pub fn pointer_move(&mut self, board: &mut Board, x: f32, y: f32) -> bool {
        let DragPhase::Dragging(drag) = self.phase else {
            return false;
        };
        board.set_position(drag.piece, (x - drag.offset.0, y - drag.offset.1))
    }

    /// Dragging -> Idle. Snaps when the piece is strictly closer to its target
    /// than the board's snap distance.
    pub fn pointer_up(&mut self, board: &mut Board) -> Option<Release> {
        let DragPhase::Dragging(drag) = std::mem::take(&mut self.phase) else {
            return None;
        };
        board.piece(drag.piece)?;
        if board.within_snap(drag.piece) && board.lock_in_place(drag.piece) {
            Some(Release::Snapped { piece: drag.piece })
        } else {
            Some(Release::Dropped { piece: drag.piece })
        }
    }

    /// Pointer left the surface: commit exactly like a release.
    pub fn pointer_cancel(&mut self, board: &mut Board) -> Option<Release> {
        self.pointer_up(board)
    }

    /// Drops drag focus without committing anything.
    pub fn abandon(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ImageInfo;
    use crate::rules::BoardConfig;

    fn board() -> Board {
        Board::new(ImageInfo::new(400, 400), BoardConfig::new(4, 400.0, 400.0)).expect("board")
    }

    #[test]
    fn press_on_empty_space_stays_idle() {
        let mut board = board();
        for index in 0..4 {
            board.set_position(index, (0.0, 0.0));
        }
        let mut controller = InteractionController::new();
        assert_eq!(controller.pointer_down(&mut board, 390.0, 390.0), None);
        assert_eq!(controller.phase(), DragPhase::Idle);
    }

    #[test]
    fn drag_keeps_the_grab_offset() {
        let mut board = board();
        board.set_position(2, (50.0, 60.0));
        board.bring_to_front(2);
        let mut controller = InteractionController::new();
        assert_eq!(controller.pointer_down(&mut board, 70.0, 90.0), Some(2));
        assert_eq!(board.paint_order().top(), Some(2));
        assert!(controller.pointer_move(&mut board, 170.0, 190.0));
        assert_eq!(board.pieces()[2].current_position, (150.0, 160.0));
    }

    #[test]
    fn release_far_away_drops_without_locking() {
        let mut board = board();
        board.set_position(0, (300.0, 300.0));
        board.bring_to_front(0);
        let mut controller = InteractionController::new();
        controller.pointer_down(&mut board, 310.0, 310.0);
        assert_eq!(
            controller.pointer_up(&mut board),
            Some(Release::Dropped { piece: 0 })
        );
        assert!(!board.is_locked(0));
        assert_eq!(controller.selected(), None);
    }

    #[test]
    fn cancel_commits_like_release() {
        let mut board = board();
        board.set_position(3, (210.0, 205.0));
        board.bring_to_front(3);
        let mut controller = InteractionController::new();
        controller.pointer_down(&mut board, 220.0, 220.0);
        assert_eq!(
            controller.pointer_cancel(&mut board),
            Some(Release::Snapped { piece: 3 })
        );
        assert!(board.is_locked(3));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn release_exactly_on_the_snap_radius_drops() {
        let mut board = board();
        let (cx, cy) = board.pieces()[3].correct_position;
        board.set_position(3, (cx + 60.0, cy));
        board.bring_to_front(3);
        let mut controller = InteractionController::new();
        controller.pointer_down(&mut board, cx + 160.0, cy + 100.0);
        assert_eq!(
            controller.pointer_up(&mut board),
            Some(Release::Dropped { piece: 3 })
        );
        assert!(!board.is_locked(3));
    }

    #[test]
    fn gated_controller_ignores_presses() {
        let mut board = board();
        board.set_position(1, (0.0, 0.0));
        board.bring_to_front(1);
        let mut controller = InteractionController::new();
        controller.gate();
        assert_eq!(controller.pointer_down(&mut board, 10.0, 10.0), None);
    }

    #[test]
    fn release_without_drag_is_a_no_op() {
        let mut board = board();
        let mut controller = InteractionController::new();
        assert_eq!(controller.pointer_up(&mut board), None);
        assert!(!controller.pointer_move(&mut board, 1.0, 1.0));
    }
}
