use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use paindraw_shared::render::{draw_strokes, InkStyle, Surface};
use paindraw_shared::{draw_stroke, Backdrop, Point};

use crate::state::State;

/// A 2D canvas context driven through the shared renderer.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn for_canvas(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        Ok(Self { canvas, ctx })
    }

    pub fn to_data_url(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url()
    }

    fn backing_size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        let (width, height) = self.backing_size();
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &InkStyle) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.ctx.set_stroke_style_str(&style.css_color());
        self.ctx.set_line_width(style.line_width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for point in rest {
            self.ctx.line_to(point.x as f64, point.y as f64);
        }
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &InkStyle) -> Result<(), JsValue> {
        self.ctx.set_font(&style.css_font());
        self.ctx.set_fill_style_str(&style.css_color());
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        self.ctx.fill_text(text, at.x as f64, at.y as f64)
    }
}

impl Backdrop<HtmlImageElement> for CanvasSurface {
    fn draw_backdrop(&mut self, image: &HtmlImageElement) -> Result<(), JsValue> {
        let (width, height) = self.backing_size();
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, width, height)
    }
}

/// Clears the live canvas and replays the committed strokes, keeping any
/// gesture still in flight on top.
pub fn redraw(state: &mut State) {
    let State {
        surface, session, ..
    } = state;
    let result = surface.clear().and_then(|()| {
        draw_strokes(surface, session.committed())?;
        match session.in_progress() {
            Some(stroke) => draw_stroke(surface, stroke),
            None => Ok(()),
        }
    });
    if let Err(error) = result {
        log::warn!("redraw failed: {error:?}");
    }
}
