//! Browser shell for the jigsaw puzzle. The engine lives in `jigsaw-core`;
//! this crate owns the canvas, pointer input, local storage and the
//! JavaScript-facing handle.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod app_core;
#[cfg(target_arch = "wasm32")]
mod canvas_view;
mod input;
mod local_snapshot;
#[cfg(target_arch = "wasm32")]
mod runtime;

#[cfg(target_arch = "wasm32")]
pub use wasm::JigsawGame;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::rc::Rc;

    use js_sys::{Function, Object, Reflect, JSON};
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlImageElement};

    use crate::app_core::{time_nonce, AppCore};
    use crate::canvas_view::CanvasView;
    use crate::local_snapshot::{
        apply_saved_to_core, clear_local_snapshot, load_local_snapshot, ApplySnapshotResult,
    };
    use crate::runtime::GameRuntime;
    use jigsaw_core::game::format_progress;
    use jigsaw_core::{Board, BoardConfig, CoreAction, Hooks, ImageInfo};

    /// Handle returned to the host page. Options (all optional): `onSound(tag)`,
    /// `onStateChange()`, `onWin()`, `settings` (partial board settings) and
    /// `restore` (defaults to true).
    #[wasm_bindgen]
    pub struct JigsawGame {
        runtime: Rc<GameRuntime>,
    }

    #[wasm_bindgen]
    impl JigsawGame {
        #[wasm_bindgen(constructor)]
        pub fn new(
            canvas: HtmlCanvasElement,
            image: HtmlImageElement,
            piece_count: u32,
            options: Option<Object>,
        ) -> Result<JigsawGame, JsError> {
            console_error_panic_hook::set_once();
            if console_log::init_with_level(log::Level::Info).is_ok() {
                log::info!("jigsaw: console logger installed");
            }
            let options = options.unwrap_or_else(Object::new);
            let mut config = match Reflect::get(&options, &"settings".into()) {
                Ok(value) if !value.is_undefined() && !value.is_null() => {
                    let raw: String = JSON::stringify(&value)
                        .map_err(|_| JsError::new("settings are not serializable"))?
                        .into();
                    BoardConfig::from_json(&raw)?
                }
                _ => BoardConfig::default(),
            };
            config.piece_count = piece_count;
            config.canvas_width = canvas.width() as f32;
            config.canvas_height = canvas.height() as f32;

            let info = ImageInfo::new(image.natural_width(), image.natural_height());
            let mut board = Board::new(info, config)?;
            board.shuffle_with_nonce(time_nonce(board.scramble_nonce()));

            let core = Rc::new(AppCore::new(board, hooks_from_options(&options)));
            let restore = Reflect::get(&options, &"restore".into())
                .ok()
                .and_then(|value| value.as_bool())
                .unwrap_or(true);
            if restore {
                if let Some(saved) = load_local_snapshot() {
                    match apply_saved_to_core(&saved, Some(&core)) {
                        ApplySnapshotResult::Mismatch | ApplySnapshotResult::Finished => {
                            clear_local_snapshot();
                        }
                        ApplySnapshotResult::Applied | ApplySnapshotResult::NotReady => {}
                    }
                }
            }

            let view = core
                .with_session(|session| CanvasView::new(canvas, image, session))
                .map_err(|_| JsError::new("canvas could not be prepared"))?;
            let runtime = GameRuntime::mount(core, view, restore);
            Ok(JigsawGame { runtime })
        }

        /// Places one random unlocked piece. False when none remain.
        #[wasm_bindgen(js_name = autoPlace)]
        pub fn auto_place(&self) -> bool {
            self.runtime.apply(CoreAction::AutoPlace)
        }

        /// Completion as a percentage label.
        pub fn progress(&self) -> String {
            let (locked, total) = self.runtime.core().progress();
            format_progress(locked, total)
        }

        #[wasm_bindgen(getter, js_name = lockedCount)]
        pub fn locked_count(&self) -> u32 {
            self.runtime.core().progress().0 as u32
        }

        #[wasm_bindgen(getter, js_name = pieceCount)]
        pub fn piece_count(&self) -> u32 {
            self.runtime.core().progress().1 as u32
        }

        #[wasm_bindgen(getter)]
        pub fn solved(&self) -> bool {
            self.runtime.core().is_solved()
        }

        /// Snapshot records as JSON, for hosts that persist on their own.
        #[wasm_bindgen(js_name = exportSnapshot)]
        pub fn export_snapshot(&self) -> String {
            jigsaw_core::snapshot::records_to_json(&self.runtime.core().export_snapshot())
        }

        /// Removes listeners and stops the frame loop. A pending win callback
        /// still fires.
        pub fn destroy(&self) {
            self.runtime.destroy();
        }
    }

    fn callback(options: &Object, name: &str) -> Option<Function> {
        Reflect::get(options, &name.into())
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }

    fn hooks_from_options(options: &Object) -> Hooks {
        let on_sound = callback(options, "onSound").map(|function| {
            Rc::new(move |event: jigsaw_core::SoundEvent| {
                let _ = function.call1(&JsValue::NULL, &JsValue::from_str(event.as_str()));
            }) as Rc<dyn Fn(jigsaw_core::SoundEvent)>
        });
        let on_state_change = callback(options, "onStateChange").map(|function| {
            Rc::new(move || {
                let _ = function.call0(&JsValue::NULL);
            }) as Rc<dyn Fn()>
        });
        let on_win = callback(options, "onWin").map(|function| {
            Rc::new(move || {
                let _ = function.call0(&JsValue::NULL);
            }) as Rc<dyn Fn()>
        });
        Hooks {
            on_sound,
            on_state_change,
            on_win,
        }
    }
}
