use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;

use crate::app_core::{now_ms, AppCore, AppSubscription};
use crate::canvas_view::CanvasView;
use crate::input::{client_to_board, install_pointer_listeners, ClientRect, InputEvent, PointerGate};
use crate::local_snapshot::persist_local_snapshot;
use jigsaw_core::CoreAction;

/// Browser side of one mounted game: input listeners, the animation frame
/// loop and the win timer, all driving a shared `AppCore`.
pub(crate) struct GameRuntime {
    core: Rc<AppCore>,
    view: CanvasView,
    gate: RefCell<PointerGate>,
    persist: bool,
    frame_handle: RefCell<Option<AnimationFrame>>,
    win_timer_armed: Cell<bool>,
    listeners: RefCell<Vec<EventListener>>,
    subscription: RefCell<Option<AppSubscription>>,
    destroyed: Cell<bool>,
}

impl GameRuntime {
    pub(crate) fn mount(core: Rc<AppCore>, view: CanvasView, persist: bool) -> Rc<Self> {
        let runtime = Rc::new(Self {
            core,
            view,
            gate: RefCell::new(PointerGate::new()),
            persist,
            frame_handle: RefCell::new(None),
            win_timer_armed: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            subscription: RefCell::new(None),
            destroyed: Cell::new(false),
        });
        runtime.install();
        runtime.render();
        runtime
    }

    fn install(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let listeners = install_pointer_listeners(
            self.view.canvas(),
            Rc::new(move |event| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.handle_input(event);
                }
            }),
        );
        *self.listeners.borrow_mut() = listeners;

        let weak: Weak<Self> = Rc::downgrade(self);
        let subscription = self.core.subscribe(Rc::new(move || {
            if let Some(runtime) = weak.upgrade() {
                runtime.render_if_idle();
            }
        }));
        *self.subscription.borrow_mut() = Some(subscription);
    }

    pub(crate) fn core(&self) -> &Rc<AppCore> {
        &self.core
    }

    fn handle_input(self: &Rc<Self>, event: InputEvent) {
        let rect = ClientRect::from(self.view.canvas().get_bounding_client_rect());
        let canvas_size = self.core.with_session(|session| session.board().canvas_size());
        let Some(position) = client_to_board(event.client_x, event.client_y, rect, canvas_size)
        else {
            return;
        };
        let action = self.gate.borrow_mut().route(&event, position);
        if let Some(action) = action {
            self.apply(action);
        }
    }

    /// Dispatches one action and keeps frames, the win timer and local
    /// storage in step with it.
    pub(crate) fn apply(self: &Rc<Self>, action: CoreAction) -> bool {
        if self.destroyed.get() {
            return false;
        }
        let changed = self.core.dispatch(action, now_ms());
        let commits = matches!(
            action,
            CoreAction::PointerUp | CoreAction::PointerCancel | CoreAction::AutoPlace
        );
        if changed && commits && self.persist {
            persist_local_snapshot(&self.core);
        }
        self.ensure_frame();
        self.ensure_win_timer();
        changed
    }

    fn ensure_frame(self: &Rc<Self>) {
        if self.core.request_frame() {
            self.schedule_frame();
        }
    }

    fn schedule_frame(self: &Rc<Self>) {
        let runtime = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            runtime.frame_handle.borrow_mut().take();
            runtime.on_frame();
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>) {
        if self.destroyed.get() {
            return;
        }
        let again = self.core.frame(now_ms());
        self.render();
        if again {
            self.schedule_frame();
        }
    }

    /// The win timer is never cancelled; once armed it fires even if the game
    /// is torn down first.
    fn ensure_win_timer(self: &Rc<Self>) {
        if self.win_timer_armed.get() {
            return;
        }
        let Some(due) = self.core.win_due_ms() else {
            return;
        };
        self.win_timer_armed.set(true);
        let delay = (due - now_ms()).max(0.0).ceil() as u32;
        let core = Rc::clone(&self.core);
        Timeout::new(delay, move || {
            core.poll_timers(due);
        })
        .forget();
    }

    fn render_if_idle(&self) {
        if self.frame_handle.borrow().is_none() {
            self.render();
        }
    }

    fn render(&self) {
        let now = now_ms();
        self.core.with_session(|session| self.view.render(session, now));
    }

    pub(crate) fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.listeners.borrow_mut().clear();
        self.frame_handle.borrow_mut().take();
        self.subscription.borrow_mut().take();
        self.gate.borrow_mut().reset();
        self.core.detach();
        gloo::console::log!("jigsaw: destroyed");
    }
}
