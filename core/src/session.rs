//! One playing session: the board plus everything that reacts to input.

use std::fmt;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::action::CoreAction;
use crate::board::Board;
use crate::controller::{InteractionController, Release};
use crate::particles::{BurstKind, ParticleSystem};
use crate::scheduler::{Deadline, FrameScheduler};
use crate::snapshot::{ImportReport, PieceRecord};

/// Length of the auto-place glide, in host milliseconds.
pub const PLACEMENT_MS: f64 = 250.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Pickup,
    Snap,
    Win,
}

impl SoundEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SoundEvent::Pickup => "pickup",
            SoundEvent::Snap => "snap",
            SoundEvent::Win => "win",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host callbacks. Every hook is optional; a missing one is a no-op.
#[derive(Clone, Default)]
pub struct Hooks {
    pub on_sound: Option<Rc<dyn Fn(SoundEvent)>>,
    /// Called after every committed change (snap, drop, auto-place).
    pub on_state_change: Option<Rc<dyn Fn()>>,
    pub on_win: Option<Rc<dyn Fn()>>,
}

impl Hooks {
    fn sound(&self, event: SoundEvent) {
        if let Some(hook) = &self.on_sound {
            hook(event);
        }
    }

    fn state_changed(&self) {
        if let Some(hook) = &self.on_state_change {
            hook();
        }
    }

    fn win(&self) {
        if let Some(hook) = &self.on_win {
            hook();
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_sound", &self.on_sound.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .field("on_win", &self.on_win.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Placement {
    piece: usize,
    from: (f32, f32),
    start_ms: Option<f64>,
}

#[derive(Debug)]
pub struct Session {
    board: Board,
    controller: InteractionController,
    particles: ParticleSystem,
    scheduler: FrameScheduler,
    hooks: Hooks,
    win_deadline: Deadline,
    solved: bool,
    win_fired: bool,
    detached: bool,
    rng: StdRng,
    placements: Vec<Placement>,
}

impl Session {
    /// Wraps a board. A board that is already solved (a restored finished
    /// game) starts gated and never fires the win hook again.
    pub fn new(board: Board, hooks: Hooks) -> Self {
        let seed = (u64::from(board.config().seed) << 32) | u64::from(board.scramble_nonce());
        let solved = board.is_solved();
        let mut controller = InteractionController::new();
        if solved {
            controller.gate();
        }
        Self {
            board,
            controller,
            particles: ParticleSystem::new(seed ^ 0x9E37_79B9),
            scheduler: FrameScheduler::new(),
            hooks,
            win_deadline: Deadline::default(),
            solved,
            win_fired: solved,
            detached: false,
            rng: StdRng::seed_from_u64(seed),
            placements: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn win_fired(&self) -> bool {
        self.win_fired
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Host time at which the win hook is due, while it is pending.
    pub fn win_due_ms(&self) -> Option<f64> {
        self.win_deadline.due_ms()
    }

    /// True while anything on screen is still moving.
    pub fn has_work(&self) -> bool {
        !self.particles.is_empty() || self.controller.is_dragging() || !self.placements.is_empty()
    }

    /// True when the host should request an animation frame now.
    pub fn request_frame(&mut self) -> bool {
        if self.detached || !self.has_work() {
            return false;
        }
        self.scheduler.request()
    }

    /// Runs one animation frame. Returns whether another frame is wanted.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if self.detached {
            self.scheduler.cancel();
            return false;
        }
        self.particles.step();
        self.placements.retain_mut(|placement| {
            let start = *placement.start_ms.get_or_insert(now_ms);
            now_ms - start < PLACEMENT_MS
        });
        self.poll_timers(now_ms);
        let has_work = self.has_work();
        self.scheduler.finish_frame(has_work)
    }

    /// Fires the win hook once its deadline has passed. Returns true on the
    /// call that fired it.
    pub fn poll_timers(&mut self, now_ms: f64) -> bool {
        if !self.win_deadline.poll(now_ms) || self.win_fired {
            return false;
        }
        self.win_fired = true;
        log::info!("session: win");
        self.hooks.win();
        true
    }

    pub fn apply_action(&mut self, action: CoreAction, now_ms: f64) -> bool {
        match action {
            CoreAction::PointerDown { x, y } => self.pointer_down(x, y),
            CoreAction::PointerMove { x, y } => self.pointer_move(x, y),
            CoreAction::PointerUp => self.pointer_up(now_ms).is_some(),
            CoreAction::PointerCancel => self.pointer_cancel(now_ms).is_some(),
            CoreAction::AutoPlace => self.auto_place(now_ms),
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.detached {
            return false;
        }
        let Some(piece) = self.controller.pointer_down(&mut self.board, x, y) else {
            return false;
        };
        log::debug!("session: picked up piece {}", piece);
        self.hooks.sound(SoundEvent::Pickup);
        true
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        if self.detached {
            return false;
        }
        self.controller.pointer_move(&mut self.board, x, y)
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> Option<Release> {
        if self.detached {
            return None;
        }
        let release = self.controller.pointer_up(&mut self.board)?;
        self.commit_release(release, now_ms);
        Some(release)
    }

    pub fn pointer_cancel(&mut self, now_ms: f64) -> Option<Release> {
        if self.detached {
            return None;
        }
        let release = self.controller.pointer_cancel(&mut self.board)?;
        self.commit_release(release, now_ms);
        Some(release)
    }

    fn commit_release(&mut self, release: Release, now_ms: f64) {
        if let Release::Snapped { piece } = release {
            if let Some((x, y)) = self.board.piece(piece).map(|p| p.center()) {
                self.particles.spawn(x, y, BurstKind::Snap);
            }
            self.hooks.sound(SoundEvent::Snap);
        }
        self.hooks.state_changed();
        self.check_solved(now_ms);
    }

    /// Locks one random unlocked piece that is not being dragged. Returns
    /// false when there is nothing left to place.
    pub fn auto_place(&mut self, now_ms: f64) -> bool {
        if self.detached {
            return false;
        }
        let dragged = self.controller.selected();
        let candidates: Vec<usize> = self
            .board
            .unlocked()
            .into_iter()
            .filter(|&index| Some(index) != dragged)
            .collect();
        if candidates.is_empty() {
            log::debug!("session: auto-place found no unlocked piece");
            return false;
        }
        let piece = candidates[self.rng.random_range(0..candidates.len())];
        let Some(from) = self.board.piece(piece).map(|p| p.current_position) else {
            return false;
        };
        if !self.board.lock_in_place(piece) {
            return false;
        }
        self.placements.retain(|placement| placement.piece != piece);
        self.placements.push(Placement {
            piece,
            from,
            start_ms: None,
        });
        if let Some((x, y)) = self.board.piece(piece).map(|p| p.center()) {
            self.particles.spawn(x, y, BurstKind::AutoPlace);
        }
        log::debug!("session: auto-placed piece {}", piece);
        self.hooks.sound(SoundEvent::Snap);
        self.hooks.state_changed();
        self.check_solved(now_ms);
        true
    }

    fn check_solved(&mut self, now_ms: f64) {
        if self.solved || !self.board.is_solved() {
            return;
        }
        self.solved = true;
        self.controller.gate();
        let (width, height) = self.board.canvas_size();
        self.particles.spawn(width / 2.0, height / 2.0, BurstKind::Celebration);
        self.hooks.sound(SoundEvent::Win);
        let delay = f64::from(self.board.config().rules.win_delay_ms);
        self.win_deadline.arm(now_ms + delay);
        log::info!(
            "session: solved {} pieces, win due in {}ms",
            self.board.piece_count(),
            delay
        );
    }

    /// Where a piece should be drawn: its board position, except during an
    /// auto-place glide.
    pub fn display_position(&self, index: usize, now_ms: f64) -> Option<(f32, f32)> {
        let piece = self.board.piece(index)?;
        let target = piece.current_position;
        let Some(placement) = self.placements.iter().find(|p| p.piece == index) else {
            return Some(target);
        };
        let elapsed = placement.start_ms.map_or(0.0, |start| now_ms - start);
        if elapsed >= PLACEMENT_MS {
            return Some(target);
        }
        let t = (elapsed / PLACEMENT_MS).clamp(0.0, 1.0) as f32;
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        Some((
            placement.from.0 + (target.0 - placement.from.0) * eased,
            placement.from.1 + (target.1 - placement.from.1) * eased,
        ))
    }

    pub fn export_snapshot(&self) -> Vec<PieceRecord> {
        self.board.export_snapshot()
    }

    /// Restores piece state. Any drag is dropped first. A restore that yields
    /// a solved board gates input without replaying the win.
    pub fn import_snapshot(&mut self, records: &[PieceRecord]) -> ImportReport {
        self.controller.abandon();
        self.placements.clear();
        let report = self.board.import_snapshot(records);
        if self.board.is_solved() && !self.solved {
            self.solved = true;
            self.win_fired = true;
            self.controller.gate();
        }
        report
    }

    /// Teardown: clears any drag and ignores all further input and frames.
    pub fn detach(&mut self) {
        self.detached = true;
        self.controller.abandon();
        self.controller.gate();
        self.scheduler.cancel();
        self.particles.clear();
        self.placements.clear();
    }
}
