use jigsaw_core::CoreAction;

#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{DomRect, Event, HtmlCanvasElement, PointerEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

impl PointerKind {
    pub(crate) fn from_pointer_type(value: &str) -> Self {
        match value {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PointerId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputEventKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
}

impl InputEventKind {
    pub(crate) fn from_event_type(value: &str) -> Option<Self> {
        match value {
            "pointerdown" => Some(InputEventKind::Down),
            "pointermove" => Some(InputEventKind::Move),
            "pointerup" => Some(InputEventKind::Up),
            "pointercancel" => Some(InputEventKind::Cancel),
            "pointerleave" => Some(InputEventKind::Leave),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct InputEvent {
    pub kind: InputEventKind,
    pub pointer: PointerId,
    pub pointer_kind: PointerKind,
    pub is_primary: bool,
    pub button: i16,
    pub client_x: f32,
    pub client_y: f32,
}

/// On-screen box of the canvas element, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[cfg(target_arch = "wasm32")]
impl From<DomRect> for ClientRect {
    fn from(rect: DomRect) -> Self {
        Self {
            left: rect.left() as f32,
            top: rect.top() as f32,
            width: rect.width() as f32,
            height: rect.height() as f32,
        }
    }
}

/// Maps client coordinates onto the board canvas, which may be displayed
/// scaled. None while the element has no layout box.
pub(crate) fn client_to_board(
    client_x: f32,
    client_y: f32,
    rect: ClientRect,
    canvas_size: (f32, f32),
) -> Option<(f32, f32)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = (client_x - rect.left) * canvas_size.0 / rect.width;
    let y = (client_y - rect.top) * canvas_size.1 / rect.height;
    Some((x, y))
}

/// Lets one pointer at a time drive the board. Secondary touches and
/// non-primary mouse buttons are ignored; leaving the surface cancels.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PointerGate {
    active: Option<PointerId>,
}

impl PointerGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn active(&self) -> Option<PointerId> {
        self.active
    }

    pub(crate) fn route(&mut self, event: &InputEvent, board_pos: (f32, f32)) -> Option<CoreAction> {
        let (x, y) = board_pos;
        match event.kind {
            InputEventKind::Down => {
                if self.active.is_some() || !event.is_primary {
                    return None;
                }
                if event.pointer_kind == PointerKind::Mouse && event.button != 0 {
                    return None;
                }
                self.active = Some(event.pointer);
                Some(CoreAction::PointerDown { x, y })
            }
            InputEventKind::Move => {
                (self.active == Some(event.pointer)).then_some(CoreAction::PointerMove { x, y })
            }
            InputEventKind::Up => self.release(event.pointer, CoreAction::PointerUp),
            InputEventKind::Cancel | InputEventKind::Leave => {
                self.release(event.pointer, CoreAction::PointerCancel)
            }
        }
    }

    fn release(&mut self, pointer: PointerId, action: CoreAction) -> Option<CoreAction> {
        if self.active != Some(pointer) {
            return None;
        }
        self.active = None;
        Some(action)
    }

    pub(crate) fn reset(&mut self) {
        self.active = None;
    }
}

#[cfg(target_arch = "wasm32")]
const POINTER_EVENTS: [&str; 5] = [
    "pointerdown",
    "pointermove",
    "pointerup",
    "pointercancel",
    "pointerleave",
];

/// Installs pointer listeners on the canvas. Dropping the returned listeners
/// removes them.
#[cfg(target_arch = "wasm32")]
pub(crate) fn install_pointer_listeners(
    canvas: &HtmlCanvasElement,
    on_input: Rc<dyn Fn(InputEvent)>,
) -> Vec<EventListener> {
    POINTER_EVENTS
        .iter()
        .map(|&name| {
            let on_input = Rc::clone(&on_input);
            EventListener::new_with_options(
                canvas,
                name,
                EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: false,
                },
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let Some(kind) = InputEventKind::from_event_type(&event.type_()) else {
                        return;
                    };
                    if kind == InputEventKind::Down {
                        event.prevent_default();
                    }
                    on_input(InputEvent {
                        kind,
                        pointer: PointerId(event.pointer_id()),
                        pointer_kind: PointerKind::from_pointer_type(&event.pointer_type()),
                        is_primary: event.is_primary(),
                        button: event.button(),
                        client_x: event.client_x() as f32,
                        client_y: event.client_y() as f32,
                    });
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: InputEventKind, pointer: i32) -> InputEvent {
        InputEvent {
            kind,
            pointer: PointerId(pointer),
            pointer_kind: PointerKind::Touch,
            is_primary: true,
            button: 0,
            client_x: 0.0,
            client_y: 0.0,
        }
    }

    #[test]
    fn scaled_canvas_maps_to_board_pixels() {
        let rect = ClientRect {
            left: 10.0,
            top: 20.0,
            width: 300.0,
            height: 150.0,
        };
        assert_eq!(client_to_board(160.0, 95.0, rect, (600.0, 300.0)), Some((300.0, 150.0)));
        assert_eq!(client_to_board(10.0, 20.0, rect, (600.0, 300.0)), Some((0.0, 0.0)));
    }

    #[test]
    fn collapsed_element_maps_nothing() {
        let rect = ClientRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 100.0,
        };
        assert_eq!(client_to_board(1.0, 1.0, rect, (100.0, 100.0)), None);
    }

    #[test]
    fn only_the_first_pointer_drives() {
        let mut gate = PointerGate::new();
        assert_eq!(
            gate.route(&event(InputEventKind::Down, 1), (5.0, 6.0)),
            Some(CoreAction::PointerDown { x: 5.0, y: 6.0 })
        );
        assert_eq!(gate.route(&event(InputEventKind::Down, 2), (0.0, 0.0)), None);
        assert_eq!(gate.route(&event(InputEventKind::Move, 2), (0.0, 0.0)), None);
        assert_eq!(
            gate.route(&event(InputEventKind::Move, 1), (7.0, 8.0)),
            Some(CoreAction::PointerMove { x: 7.0, y: 8.0 })
        );
        assert_eq!(
            gate.route(&event(InputEventKind::Up, 1), (7.0, 8.0)),
            Some(CoreAction::PointerUp)
        );
        assert_eq!(gate.active(), None);
    }

    #[test]
    fn leaving_cancels_the_drag() {
        let mut gate = PointerGate::new();
        gate.route(&event(InputEventKind::Down, 3), (0.0, 0.0));
        assert_eq!(
            gate.route(&event(InputEventKind::Leave, 3), (0.0, 0.0)),
            Some(CoreAction::PointerCancel)
        );
        assert_eq!(gate.route(&event(InputEventKind::Leave, 3), (0.0, 0.0)), None);
    }

    #[test]
    fn secondary_mouse_buttons_are_ignored() {
        let mut gate = PointerGate::new();
        let right_click = InputEvent {
            pointer_kind: PointerKind::Mouse,
            button: 2,
            ..event(InputEventKind::Down, 1)
        };
        assert_eq!(gate.route(&right_click, (0.0, 0.0)), None);
        assert_eq!(PointerKind::from_pointer_type("pen"), PointerKind::Pen);
        assert_eq!(InputEventKind::from_event_type("pointerover"), None);
    }
}
