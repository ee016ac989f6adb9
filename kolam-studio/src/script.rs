//! Scripted sessions.
//!
//! A session script is a JSON document describing what a user did in the
//! live view:
//!
//! ```json
//! {
//!   "viewport": { "width": 400, "height": 700 },
//!   "background": "street.jpg",
//!   "actions": [
//!     { "action": "add", "motif": "pot" },
//!     { "action": "input", "event": { "type": "Touch", "data": {
//!         "phase": "start", "touches": [{ "id": 0, "x": 200, "y": 350 }] } } },
//!     { "action": "remove_selected" },
//!     { "action": "select_index", "index": 0 },
//!     { "action": "reset" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use kolam_core::{InputEvent, MotifKind, StudioState, Viewport};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read session script {path}: {source}")]
    Io {
        /// Script path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The script is not valid JSON or has unknown actions.
    #[error("invalid session script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One recorded user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Tap a toolbar button.
    Add {
        /// Motif to place.
        motif: MotifKind,
    },
    /// Raw touch or pointer input on the viewport.
    Input {
        /// The event.
        event: InputEvent,
    },
    /// Tap the delete control of the selected item.
    RemoveSelected,
    /// Select the n-th item in insertion order.
    SelectIndex {
        /// Zero-based index.
        index: usize,
    },
    /// Clear the selection.
    Deselect,
    /// Start over.
    Reset,
}

/// A complete session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionScript {
    /// Viewport the coordinates were recorded in.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    /// Background photo, relative to the script file.
    #[serde(default)]
    pub background: Option<PathBuf>,
    /// Actions in order.
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
}

/// What happened while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Actions that changed the state.
    pub applied: usize,
    /// Actions that were no-ops (limit reached, nothing selected, ...).
    pub ignored: usize,
}

impl SessionScript {
    /// Parse a script from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Parse`] on malformed JSON.
    pub fn from_json(text: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a script file. A relative background path is resolved against
    /// the script's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut script = Self::from_json(&text)?;
        if let (Some(background), Some(dir)) = (&script.background, path.parent()) {
            if background.is_relative() {
                script.background = Some(dir.join(background));
            }
        }
        Ok(script)
    }

    /// Replay every action against `state`.
    pub fn run(&self, state: &mut StudioState) -> ScriptSummary {
        if let Some(viewport) = self.viewport {
            state.placement.set_viewport(viewport);
        }
        let mut summary = ScriptSummary::default();
        for (step, action) in self.actions.iter().enumerate() {
            if apply(state, action) {
                summary.applied += 1;
            } else {
                tracing::debug!(step, ?action, "script action had no effect");
                summary.ignored += 1;
            }
        }
        tracing::info!(
            applied = summary.applied,
            ignored = summary.ignored,
            items = state.placement.len(),
            "session script replayed"
        );
        summary
    }
}

/// Apply one action. Returns `false` when it changed nothing.
pub fn apply(state: &mut StudioState, action: &ScriptAction) -> bool {
    match action {
        ScriptAction::Add { motif } => state.add_item(*motif).is_some(),
        ScriptAction::Input { event } => {
            let before = (state.placement.selected(), state.gesture_active());
            let moved = state.handle_input(event);
            moved || before != (state.placement.selected(), state.gesture_active())
        }
        ScriptAction::RemoveSelected => state.remove_selected().is_some(),
        ScriptAction::SelectIndex { index } => {
            let id = state.placement.items().get(*index).map(kolam_core::Item::id);
            id.is_some_and(|id| state.placement.select(id).is_ok())
        }
        ScriptAction::Deselect => {
            let had = state.placement.selected().is_some();
            state.placement.deselect();
            had
        }
        ScriptAction::Reset => {
            state.reset();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolam_core::Point;

    const SESSION: &str = r#"{
        "viewport": { "width": 400, "height": 600 },
        "actions": [
            { "action": "add", "motif": "pot" },
            { "action": "add", "motif": "dots_simple" },
            { "action": "select_index", "index": 0 },
            { "action": "input", "event": { "type": "Touch", "data": {
                "phase": "start", "touches": [{ "id": 0, "x": 200.0, "y": 300.0 }] } } },
            { "action": "input", "event": { "type": "Touch", "data": {
                "phase": "move", "touches": [{ "id": 0, "x": 260.0, "y": 320.0 }] } } },
            { "action": "input", "event": { "type": "Touch", "data": {
                "phase": "end", "touches": [] } } },
            { "action": "remove_selected" },
            { "action": "remove_selected" }
        ]
    }"#;

    #[test]
    fn test_replay_session() {
        let script = SessionScript::from_json(SESSION).expect("parse");
        let mut state = StudioState::default();
        let summary = script.run(&mut state);

        assert_eq!(state.placement.viewport(), Viewport::new(400.0, 600.0));
        // the second remove_selected finds nothing selected
        assert_eq!(summary, ScriptSummary { applied: 7, ignored: 1 });
        assert_eq!(state.placement.len(), 1);
        assert_eq!(
            state.placement.items()[0].transform.position,
            Point::new(200.0, 300.0)
        );
    }

    #[test]
    fn test_touch_start_on_top_item_selects_it() {
        // once selected, the pot is drawn above the later motif and takes the touch
        let script = SessionScript::from_json(SESSION).expect("parse");
        let mut state = StudioState::new(Viewport::new(400.0, 600.0));
        for action in &script.actions[..4] {
            apply(&mut state, action);
        }
        let pot = state.placement.items()[0].id();
        assert_eq!(state.placement.selected(), Some(pot));
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = SessionScript::from_json(r#"{ "actions": [{ "action": "explode" }] }"#)
            .expect_err("unknown action");
        assert!(matches!(err, ScriptError::Parse(_)));
    }

    #[test]
    fn test_unknown_motif_rejected() {
        assert!(SessionScript::from_json(
            r#"{ "actions": [{ "action": "add", "motif": "kite" }] }"#
        )
        .is_err());
    }

    #[test]
    fn test_load_resolves_background_relative_to_script() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "background": "street.jpg", "actions": [] }"#)
            .expect("write");
        let script = SessionScript::load(&path).expect("load");
        assert_eq!(script.background, Some(dir.path().join("street.jpg")));
    }

    #[test]
    fn test_missing_file() {
        let err = SessionScript::load(Path::new("/nonexistent/session.json")).expect_err("missing");
        assert!(matches!(err, ScriptError::Io { .. }));
    }
}
