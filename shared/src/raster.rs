//! Headless compositing onto a `tiny-skia` pixmap, for exports produced
//! outside a browser and for checking that composites are reproducible.

use thiserror::Error;
pub use tiny_skia::{Color, Pixmap};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, PixmapPaint, Stroke,
    Transform,
};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::composite::Backdrop;
use crate::export::encode_data_url;
use crate::render::{InkStyle, Surface};
use crate::Point;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid raster size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("no font loaded to stamp symbol {0:?}")]
    MissingFont(String),
    #[error("font parse failed: {0}")]
    Font(String),
    #[error("png encode failed: {0}")]
    Encode(String),
}

pub struct PixmapSurface<'a> {
    pixmap: Pixmap,
    face: Option<Face<'a>>,
}

impl<'a> PixmapSurface<'a> {
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize(width, height))?;
        Ok(Self { pixmap, face: None })
    }

    /// Loads the TrueType face used to stamp symbol labels.
    pub fn with_font(mut self, data: &'a [u8]) -> Result<Self, RasterError> {
        let face = Face::parse(data, 0).map_err(|error| RasterError::Font(error.to_string()))?;
        self.face = Some(face);
        Ok(self)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        self.pixmap
            .encode_png()
            .map_err(|error| RasterError::Encode(error.to_string()))
    }

    pub fn to_data_url(&self) -> Result<String, RasterError> {
        Ok(encode_data_url("image/png", &self.encode_png()?))
    }
}

fn ink_paint(style: &InkStyle) -> Paint<'static> {
    let [r, g, b, a] = style.color;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

impl Surface for PixmapSurface<'_> {
    type Error = RasterError;

    fn clear(&mut self) -> Result<(), RasterError> {
        self.pixmap.fill(Color::TRANSPARENT);
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &InkStyle) -> Result<(), RasterError> {
        let mut builder = PathBuilder::new();
        for (index, point) in points.iter().enumerate() {
            if index == 0 {
                builder.move_to(point.x, point.y);
            } else {
                builder.line_to(point.x, point.y);
            }
        }
        let Some(path) = builder.finish() else {
            return Ok(());
        };
        let stroke = Stroke {
            width: style.line_width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &ink_paint(style), &stroke, Transform::identity(), None);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &InkStyle) -> Result<(), RasterError> {
        let face = self
            .face
            .as_ref()
            .ok_or_else(|| RasterError::MissingFont(text.to_string()))?;
        let scale = style.font_px / f32::from(face.units_per_em().max(1));
        let mut glyphs = GlyphPathBuilder {
            builder: PathBuilder::new(),
            origin_x: at.x,
            origin_y: at.y,
            scale,
        };
        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            face.outline_glyph(glyph, &mut glyphs);
            let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
            glyphs.origin_x += f32::from(advance) * scale;
        }
        if let Some(path) = glyphs.builder.finish() {
            self.pixmap.fill_path(
                &path,
                &ink_paint(style),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }
}

impl Backdrop<Pixmap> for PixmapSurface<'_> {
    fn draw_backdrop(&mut self, image: &Pixmap) -> Result<(), RasterError> {
        let sx = self.pixmap.width() as f32 / image.width() as f32;
        let sy = self.pixmap.height() as f32 / image.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            image.as_ref(),
            &paint,
            Transform::from_scale(sx, sy),
            None,
        );
        Ok(())
    }
}

/// Font units are y-up, the pixmap is y-down; glyphs sit on the baseline at
/// `origin_y`.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
