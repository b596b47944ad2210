use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::app_core::AppCore;
use jigsaw_core::SavedPuzzle;

pub(crate) const LOCAL_GAME_KEY: &str = "jigsaw.game.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ApplySnapshotResult {
    Applied,
    NotReady,
    Mismatch,
    Finished,
}

/// What to do with local storage after a committed change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PersistAction {
    Save,
    Clear,
}

pub(crate) fn persist_action(core: &AppCore) -> PersistAction {
    if core.is_solved() {
        PersistAction::Clear
    } else {
        PersistAction::Save
    }
}

pub(crate) fn encode_saved(saved: &SavedPuzzle) -> Option<String> {
    let bytes = saved.to_bytes().ok()?;
    Some(STANDARD.encode(bytes))
}

pub(crate) fn decode_saved(raw: &str) -> Option<SavedPuzzle> {
    if raw.is_empty() {
        return None;
    }
    let bytes = STANDARD.decode(raw.as_bytes()).ok()?;
    SavedPuzzle::from_bytes(&bytes).ok()
}

pub(crate) fn apply_saved_to_core(saved: &SavedPuzzle, core: Option<&AppCore>) -> ApplySnapshotResult {
    let Some(core) = core else {
        #[cfg(target_arch = "wasm32")]
        {
            gloo::console::log!("local snapshot: restore not ready (no board)");
        }
        return ApplySnapshotResult::NotReady;
    };
    if !core.matches_saved(saved) {
        #[cfg(target_arch = "wasm32")]
        {
            gloo::console::log!(
                "local snapshot: restore mismatch",
                saved.piece_count,
                saved.image_width,
                saved.image_height
            );
        }
        return ApplySnapshotResult::Mismatch;
    }
    if saved.is_finished() {
        #[cfg(target_arch = "wasm32")]
        {
            gloo::console::log!("local snapshot: saved puzzle already finished");
        }
        return ApplySnapshotResult::Finished;
    }
    let report = core.import_snapshot(&saved.records);
    log::debug!(
        "local snapshot: applied {} records, skipped {}",
        report.applied,
        report.skipped
    );
    #[cfg(target_arch = "wasm32")]
    {
        gloo::console::log!("local snapshot: restore applied");
    }
    ApplySnapshotResult::Applied
}

pub(crate) fn load_local_snapshot() -> Option<SavedPuzzle> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window()?;
        let storage = window.local_storage().ok()??;
        let raw = storage.get_item(LOCAL_GAME_KEY).ok()??;
        let Some(saved) = decode_saved(&raw) else {
            gloo::console::warn!("local snapshot: unreadable value");
            return None;
        };
        gloo::console::log!("local snapshot: loaded");
        Some(saved)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

pub(crate) fn save_local_snapshot(core: &AppCore) {
    let saved = core.saved_puzzle();
    let Some(raw) = encode_saved(&saved) else {
        log::warn!("local snapshot: encode failed");
        return;
    };
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
        else {
            gloo::console::log!("local snapshot: storage unavailable");
            return;
        };
        if storage.set_item(LOCAL_GAME_KEY, &raw).is_err() {
            gloo::console::warn!("local snapshot: storage set failed");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = raw;
    }
}

/// Saves an unfinished board and drops the save once it is solved.
pub(crate) fn persist_local_snapshot(core: &AppCore) {
    match persist_action(core) {
        PersistAction::Save => save_local_snapshot(core),
        PersistAction::Clear => clear_local_snapshot(),
    }
}

pub(crate) fn clear_local_snapshot() {
    #[cfg(target_arch = "wasm32")]
    {
        let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
        else {
            return;
        };
        let _ = storage.remove_item(LOCAL_GAME_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jigsaw_core::{Board, BoardConfig, CoreAction, Hooks, ImageInfo};

    fn core(count: u32) -> AppCore {
        let board = Board::new(ImageInfo::new(320, 240), BoardConfig::new(count, 320.0, 240.0))
            .expect("board");
        AppCore::new(board, Hooks::default())
    }

    #[test]
    fn storage_text_round_trips() {
        let saved = core(9).saved_puzzle();
        let raw = encode_saved(&saved).expect("encode");
        assert_eq!(decode_saved(&raw), Some(saved));
        assert_eq!(decode_saved(""), None);
        assert_eq!(decode_saved("not base64!"), None);
    }

    #[test]
    fn restore_needs_a_matching_board() {
        let saved = core(9).saved_puzzle();
        assert_eq!(apply_saved_to_core(&saved, None), ApplySnapshotResult::NotReady);
        assert_eq!(
            apply_saved_to_core(&saved, Some(&core(16))),
            ApplySnapshotResult::Mismatch
        );
        let target = core(9);
        assert_eq!(
            apply_saved_to_core(&saved, Some(&target)),
            ApplySnapshotResult::Applied
        );
        assert_eq!(target.export_snapshot(), saved.records);
    }

    #[test]
    fn solved_board_clears_instead_of_saving() {
        let core = core(4);
        for _ in 0..3 {
            assert!(core.dispatch(CoreAction::AutoPlace, 0.0));
            assert_eq!(persist_action(&core), PersistAction::Save);
        }
        assert!(core.dispatch(CoreAction::AutoPlace, 0.0));
        assert!(core.is_solved());
        assert_eq!(persist_action(&core), PersistAction::Clear);
    }

    #[test]
    fn finished_save_is_not_restored() {
        let solved = core(4);
        while solved.dispatch(CoreAction::AutoPlace, 0.0) {}
        let saved = solved.saved_puzzle();
        assert!(saved.is_finished());
        let target = core(4);
        assert_eq!(
            apply_saved_to_core(&saved, Some(&target)),
            ApplySnapshotResult::Finished
        );
        assert!(!target.is_solved());
        assert_eq!(target.progress(), (0, 4));
    }
}
