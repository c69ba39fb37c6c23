use crate::{Point, Stroke, StrokeKind};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DrawMode {
    #[default]
    Idle,
    Drawing(Stroke),
}

/// Drawing state for one page load: the gesture in flight, the undoable
/// stroke list and the strokes undo has set aside.
#[derive(Clone, Debug, Default)]
pub struct Session {
    mode: DrawMode,
    committed: Vec<Stroke>,
    redo: Vec<Stroke>,
    active_kind: StrokeKind,
    export_pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &DrawMode {
        &self.mode
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, DrawMode::Drawing(_))
    }

    pub fn in_progress(&self) -> Option<&Stroke> {
        match &self.mode {
            DrawMode::Drawing(stroke) => Some(stroke),
            DrawMode::Idle => None,
        }
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn redo_stack(&self) -> &[Stroke] {
        &self.redo
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn active_kind(&self) -> &StrokeKind {
        &self.active_kind
    }

    /// Takes effect on the next `begin_stroke`; strokes already recorded keep
    /// their kind.
    pub fn set_active_kind(&mut self, kind: StrokeKind) {
        self.active_kind = kind;
    }

    pub fn export_pending(&self) -> bool {
        self.export_pending
    }

    /// Starts a new gesture. Redo history is dropped here rather than on
    /// commit, so a gesture that is aborted still forfeits it. Refused while
    /// an export is pending.
    pub fn begin_stroke(&mut self, kind: StrokeKind) -> bool {
        if self.export_pending {
            log::debug!("export pending, stroke refused");
            return false;
        }
        if let DrawMode::Drawing(stroke) = &self.mode {
            log::debug!(
                "discarding unfinished stroke with {} points",
                stroke.points.len()
            );
        }
        self.redo.clear();
        self.mode = DrawMode::Drawing(Stroke::new(kind));
        true
    }

    /// Appends to the stroke in flight and hands it back for incremental
    /// rendering. Returns `None` when no gesture is active.
    pub fn append_point(&mut self, point: Point) -> Option<&Stroke> {
        match &mut self.mode {
            DrawMode::Drawing(stroke) => {
                stroke.points.push(point);
                Some(stroke)
            }
            DrawMode::Idle => None,
        }
    }

    pub fn commit_stroke(&mut self) -> bool {
        match std::mem::take(&mut self.mode) {
            DrawMode::Drawing(stroke) => {
                self.committed.push(stroke);
                true
            }
            DrawMode::Idle => false,
        }
    }

    /// Moves the newest committed stroke onto the redo stack. The caller
    /// redraws the surface when this returns `true`.
    pub fn undo(&mut self) -> bool {
        if self.export_pending {
            return false;
        }
        let Some(stroke) = self.committed.pop() else {
            return false;
        };
        self.redo.push(stroke);
        true
    }

    /// Restored strokes are appended to the end of the committed list.
    pub fn redo(&mut self) -> bool {
        if self.export_pending {
            return false;
        }
        let Some(stroke) = self.redo.pop() else {
            return false;
        };
        self.committed.push(stroke);
        true
    }

    pub fn reset(&mut self) {
        self.mode = DrawMode::Idle;
        self.committed.clear();
        self.redo.clear();
        self.export_pending = false;
    }

    /// Freezes the history and returns the strokes to export. A gesture
    /// still in flight is committed first. Returns `None` if an export is
    /// already pending.
    pub fn begin_export(&mut self) -> Option<Vec<Stroke>> {
        if self.export_pending {
            return None;
        }
        self.commit_stroke();
        self.export_pending = true;
        Some(self.committed.clone())
    }

    /// Unfreezes the history. A successful export clears the page; a failed
    /// one leaves every stroke in place for a retry.
    pub fn finish_export(&mut self, succeeded: bool) {
        if succeeded {
            self.reset();
        }
        self.export_pending = false;
    }
}
