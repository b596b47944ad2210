/// Input the host feeds into a session. Coordinates are canvas-space pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoreAction {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    /// Pointer left the surface mid-drag.
    PointerCancel,
    AutoPlace,
}

impl CoreAction {
    pub fn is_pointer(&self) -> bool {
        !matches!(self, CoreAction::AutoPlace)
    }
}
