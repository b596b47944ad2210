use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::{Date, Function, Reflect};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

use jigsaw_core::game::splitmix32;
use jigsaw_core::{
    Board, CoreAction, Hooks, ImportReport, PieceRecord, SavedPuzzle, Session, SoundEvent,
};

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

/// Session events waiting to be forwarded to the host once the session is no
/// longer borrowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HostEvent {
    Sound(SoundEvent),
    StateChanged,
    Win,
}

type EventQueue = Rc<RefCell<Vec<HostEvent>>>;

/// Owns the session for one mounted game. Host callbacks and subscribers run
/// after every mutation, outside the session borrow, so they may call back in.
pub(crate) struct AppCore {
    session: RefCell<Session>,
    host: Hooks,
    events: EventQueue,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl AppCore {
    pub(crate) fn new(board: Board, host: Hooks) -> Self {
        let events: EventQueue = Rc::new(RefCell::new(Vec::new()));
        let session = Session::new(board, queued_hooks(&events));
        Self {
            session: RefCell::new(session),
            host,
            events,
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    /// Read access for rendering.
    pub(crate) fn with_session<R>(&self, read: impl FnOnce(&Session) -> R) -> R {
        read(&self.session.borrow())
    }

    pub(crate) fn dispatch(&self, action: CoreAction, now_ms: f64) -> bool {
        let changed = self.session.borrow_mut().apply_action(action, now_ms);
        self.flush(changed);
        changed
    }

    pub(crate) fn request_frame(&self) -> bool {
        self.session.borrow_mut().request_frame()
    }

    /// Steps one frame; true when the host should schedule another.
    pub(crate) fn frame(&self, now_ms: f64) -> bool {
        let again = self.session.borrow_mut().frame(now_ms);
        self.flush(false);
        again
    }

    pub(crate) fn poll_timers(&self, now_ms: f64) -> bool {
        let fired = self.session.borrow_mut().poll_timers(now_ms);
        self.flush(false);
        fired
    }

    pub(crate) fn win_due_ms(&self) -> Option<f64> {
        self.session.borrow().win_due_ms()
    }

    pub(crate) fn progress(&self) -> (usize, usize) {
        self.session.borrow().board().progress()
    }

    pub(crate) fn is_solved(&self) -> bool {
        self.session.borrow().is_solved()
    }

    pub(crate) fn export_snapshot(&self) -> Vec<PieceRecord> {
        self.session.borrow().export_snapshot()
    }

    pub(crate) fn saved_puzzle(&self) -> SavedPuzzle {
        self.session.borrow().board().to_saved()
    }

    pub(crate) fn matches_saved(&self, saved: &SavedPuzzle) -> bool {
        self.session.borrow().board().matches_saved(saved)
    }

    pub(crate) fn import_snapshot(&self, records: &[PieceRecord]) -> ImportReport {
        let report = self.session.borrow_mut().import_snapshot(records);
        self.flush(report.applied > 0);
        report
    }

    pub(crate) fn detach(&self) {
        self.session.borrow_mut().detach();
        self.events.borrow_mut().clear();
        self.subscribers.borrow_mut().clear();
    }

    fn flush(&self, changed: bool) {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        for event in &events {
            match *event {
                HostEvent::Sound(sound) => {
                    if let Some(hook) = &self.host.on_sound {
                        hook(sound);
                    }
                }
                HostEvent::StateChanged => {
                    if let Some(hook) = &self.host.on_state_change {
                        hook();
                    }
                }
                HostEvent::Win => {
                    if let Some(hook) = &self.host.on_win {
                        hook();
                    }
                }
            }
        }
        if changed || !events.is_empty() {
            self.notify_subscribers();
        }
    }

    fn notify_subscribers(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

fn queued_hooks(events: &EventQueue) -> Hooks {
    let sound = Rc::clone(events);
    let state = Rc::clone(events);
    let win = Rc::clone(events);
    Hooks {
        on_sound: Some(Rc::new(move |event| {
            sound.borrow_mut().push(HostEvent::Sound(event))
        })),
        on_state_change: Some(Rc::new(move || {
            state.borrow_mut().push(HostEvent::StateChanged)
        })),
        on_win: Some(Rc::new(move || win.borrow_mut().push(HostEvent::Win))),
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

/// Scramble nonce for a fresh attempt.
pub(crate) fn time_nonce(previous: u32) -> u32 {
    #[cfg(target_arch = "wasm32")]
    {
        let now = Date::now() as u32;
        splitmix32(now ^ previous.wrapping_add(0x9E37_79B9))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u32)
            .unwrap_or(0);
        splitmix32(now ^ previous.wrapping_add(0x9E37_79B9))
    }
}

/// Monotonic host clock in milliseconds. Input, frames and the win timer all
/// read this one clock.
pub(crate) fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Ok(perf) = Reflect::get(&window, &"performance".into()) {
                if let Ok(now_fn) =
                    Reflect::get(&perf, &"now".into()).and_then(|value| value.dyn_into::<Function>())
                {
                    if let Ok(value) = now_fn.call0(&perf) {
                        if let Some(ms) = value.as_f64() {
                            return ms;
                        }
                    }
                }
            }
        }
        Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigsaw_core::{BoardConfig, ImageInfo};
    use std::cell::Cell;
    use std::rc::Weak;

    fn board() -> Board {
        Board::new(ImageInfo::new(200, 200), BoardConfig::new(4, 200.0, 200.0)).expect("board")
    }

    #[test]
    fn subscribers_follow_mutations_until_dropped() {
        let core = AppCore::new(board(), Hooks::default());
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let subscription = core.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
        assert!(core.dispatch(CoreAction::AutoPlace, 0.0));
        assert_eq!(hits.get(), 1);
        drop(subscription);
        assert!(core.dispatch(CoreAction::AutoPlace, 0.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn host_hooks_may_read_back_into_the_core() {
        let slot: Rc<RefCell<Weak<AppCore>>> = Rc::new(RefCell::new(Weak::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let reader = slot.clone();
        let log = seen.clone();
        let host = Hooks {
            on_state_change: Some(Rc::new(move || {
                if let Some(core) = reader.borrow().upgrade() {
                    log.borrow_mut().push(core.progress());
                }
            })),
            ..Hooks::default()
        };
        let core = Rc::new(AppCore::new(board(), host));
        *slot.borrow_mut() = Rc::downgrade(&core);
        core.dispatch(CoreAction::AutoPlace, 0.0);
        core.dispatch(CoreAction::AutoPlace, 0.0);
        assert_eq!(*seen.borrow(), vec![(1, 4), (2, 4)]);
    }

    #[test]
    fn win_reaches_the_host_once() {
        let wins = Rc::new(Cell::new(0));
        let counter = wins.clone();
        let host = Hooks {
            on_win: Some(Rc::new(move || counter.set(counter.get() + 1))),
            ..Hooks::default()
        };
        let core = AppCore::new(board(), host);
        while core.dispatch(CoreAction::AutoPlace, 10.0) {}
        assert!(core.is_solved());
        let due = core.win_due_ms().expect("win pending");
        assert!(!core.poll_timers(due - 1.0));
        assert!(core.poll_timers(due));
        assert!(!core.poll_timers(due + 1.0));
        assert_eq!(wins.get(), 1);
    }

    #[test]
    fn detach_silences_the_core() {
        let core = AppCore::new(board(), Hooks::default());
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let _subscription = core.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
        core.detach();
        assert!(!core.dispatch(CoreAction::AutoPlace, 0.0));
        assert_eq!(hits.get(), 0);
        assert_eq!(core.progress(), (0, 4));
    }
}
