use web_sys::HtmlCanvasElement;

use paindraw_shared::Session;

use crate::render::CanvasSurface;

/// Background image drawn under the strokes when nothing else is configured.
pub const DEFAULT_BACKGROUND: &str = "body-diagram.png";

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub surface: CanvasSurface,
    pub session: Session,
}

impl State {
    pub fn new(canvas: HtmlCanvasElement, surface: CanvasSurface) -> Self {
        Self {
            canvas,
            surface,
            session: Session::new(),
        }
    }
}
