use paindraw_shared::{draw_latest, Point, StrokeKind};

use crate::render::redraw;
use crate::state::State;

pub fn start_stroke(state: &mut State, point: Point) {
    let kind = state.session.active_kind().clone();
    if state.session.begin_stroke(kind) {
        extend_stroke(state, point);
    }
}

pub fn extend_stroke(state: &mut State, point: Point) {
    let State {
        surface, session, ..
    } = state;
    let Some(stroke) = session.append_point(point) else {
        return;
    };
    if let Err(error) = draw_latest(surface, stroke) {
        log::warn!("incremental draw failed: {error:?}");
    }
}

pub fn end_stroke(state: &mut State) {
    if state.session.commit_stroke() {
        log::debug!("stroke committed, {} on canvas", state.session.committed().len());
    }
}

pub fn undo(state: &mut State) {
    if state.session.undo() {
        redraw(state);
    }
}

pub fn redo(state: &mut State) {
    if state.session.redo() {
        redraw(state);
    }
}

pub fn select_kind(state: &mut State, value: &str) {
    let kind = StrokeKind::from_selector_value(value);
    log::debug!("stroke kind set to {kind:?}");
    state.session.set_active_kind(kind);
}

/// Unlocks drawing after an export. On success the PDF holds every stroke,
/// so the page is cleared.
pub fn finish_export(state: &mut State, succeeded: bool) {
    state.session.finish_export(succeeded);
    if succeeded {
        redraw(state);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
}

impl Shortcut {
    pub fn from_key(key: &str, command: bool, shift: bool) -> Option<Self> {
        if !command {
            return None;
        }
        match key {
            "z" | "Z" if shift => Some(Shortcut::Redo),
            "z" | "Z" => Some(Shortcut::Undo),
            "y" | "Y" => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_need_a_command_modifier() {
        assert_eq!(Shortcut::from_key("z", false, false), None);
        assert_eq!(Shortcut::from_key("z", true, false), Some(Shortcut::Undo));
        assert_eq!(Shortcut::from_key("Z", true, true), Some(Shortcut::Redo));
        assert_eq!(Shortcut::from_key("y", true, false), Some(Shortcut::Redo));
        assert_eq!(Shortcut::from_key("x", true, false), None);
    }
}
