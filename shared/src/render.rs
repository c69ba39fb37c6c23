use crate::{Point, Stroke, StrokeKind};

/// Symbol strokes stamp their label on every Nth recorded point.
pub const SYMBOL_SPACING: usize = 15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InkStyle {
    pub color: [u8; 4],
    pub line_width: f32,
    pub font_px: f32,
    pub font_family: &'static str,
}

pub const INK: InkStyle = InkStyle {
    color: [255, 0, 0, 255],
    line_width: 2.0,
    font_px: 16.0,
    font_family: "sans-serif",
};

impl InkStyle {
    pub fn css_color(&self) -> String {
        let [r, g, b, a] = self.color;
        format!("rgba({r}, {g}, {b}, {})", a as f32 / 255.0)
    }

    pub fn css_font(&self) -> String {
        format!("{}px {}", self.font_px, self.font_family)
    }
}

/// A drawing target the renderer can replay strokes onto. Polylines are
/// stroked with round caps and joins; text is left aligned on its baseline.
pub trait Surface {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;
    fn stroke_polyline(&mut self, points: &[Point], style: &InkStyle) -> Result<(), Self::Error>;
    fn fill_text(&mut self, text: &str, at: Point, style: &InkStyle) -> Result<(), Self::Error>;
}

pub fn is_stamp_index(index: usize) -> bool {
    index % SYMBOL_SPACING == 0
}

pub fn stamp_indices(len: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(SYMBOL_SPACING)
}

pub fn draw_stroke<S: Surface + ?Sized>(surface: &mut S, stroke: &Stroke) -> Result<(), S::Error> {
    match &stroke.kind {
        StrokeKind::FreeLine => {
            if stroke.points.len() < 2 {
                return Ok(());
            }
            surface.stroke_polyline(&stroke.points, &INK)
        }
        StrokeKind::Symbol(label) => {
            for index in stamp_indices(stroke.points.len()) {
                surface.fill_text(label, stroke.points[index], &INK)?;
            }
            Ok(())
        }
    }
}

/// Draws only what the newest point adds to an in-progress stroke.
pub fn draw_latest<S: Surface + ?Sized>(surface: &mut S, stroke: &Stroke) -> Result<(), S::Error> {
    let Some(newest) = stroke.points.len().checked_sub(1) else {
        return Ok(());
    };
    match &stroke.kind {
        StrokeKind::FreeLine => {
            if newest == 0 {
                return Ok(());
            }
            surface.stroke_polyline(&stroke.points[newest - 1..], &INK)
        }
        StrokeKind::Symbol(label) => {
            if !is_stamp_index(newest) {
                return Ok(());
            }
            surface.fill_text(label, stroke.points[newest], &INK)
        }
    }
}

pub fn draw_strokes<S: Surface + ?Sized>(surface: &mut S, strokes: &[Stroke]) -> Result<(), S::Error> {
    for stroke in strokes {
        draw_stroke(surface, stroke)?;
    }
    Ok(())
}

pub fn redraw<S: Surface + ?Sized>(surface: &mut S, strokes: &[Stroke]) -> Result<(), S::Error> {
    surface.clear()?;
    draw_strokes(surface, strokes)
}
