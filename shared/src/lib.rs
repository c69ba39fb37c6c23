use serde::{Deserialize, Serialize};

pub mod composite;
pub mod export;
pub mod mapper;
#[cfg(feature = "raster")]
pub mod raster;
pub mod render;
pub mod session;

pub use composite::{composite, Backdrop};
pub use export::{download_filename, encode_data_url, DataUrl, DataUrlError, ExportRequest};
pub use mapper::{CanvasGeometry, PointerSample};
pub use render::{draw_latest, draw_stroke, draw_strokes, redraw, stamp_indices, InkStyle, Surface};
pub use session::{DrawMode, Session};

/// Selector value that picks continuous ink instead of a symbol.
pub const FREE_LINE_VALUE: &str = "free";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a point from canvas-space coordinates, dropping non-finite input.
    pub fn finite(x: f64, y: f64) -> Option<Self> {
        let point = Self {
            x: x as f32,
            y: y as f32,
        };
        if !point.x.is_finite() || !point.y.is_finite() {
            return None;
        }
        Some(point)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(tag = "type", content = "label")]
pub enum StrokeKind {
    #[default]
    FreeLine,
    Symbol(String),
}

impl StrokeKind {
    /// Maps a stroke-type selector value onto a kind. `free` and the empty
    /// string mean continuous ink, anything else is stamped as text.
    pub fn from_selector_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == FREE_LINE_VALUE {
            StrokeKind::FreeLine
        } else {
            StrokeKind::Symbol(value.to_string())
        }
    }

    pub fn selector_value(&self) -> &str {
        match self {
            StrokeKind::FreeLine => FREE_LINE_VALUE,
            StrokeKind::Symbol(label) => label,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Stroke {
    pub kind: StrokeKind,
    pub points: Vec<Point>,
}

impl Stroke {
    pub fn new(kind: StrokeKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_values_map_to_kinds() {
        assert_eq!(StrokeKind::from_selector_value("free"), StrokeKind::FreeLine);
        assert_eq!(StrokeKind::from_selector_value(""), StrokeKind::FreeLine);
        assert_eq!(
            StrokeKind::from_selector_value("X"),
            StrokeKind::Symbol("X".to_string())
        );
        assert_eq!(StrokeKind::Symbol("O".into()).selector_value(), "O");
        assert_eq!(StrokeKind::FreeLine.selector_value(), "free");
    }

    #[test]
    fn finite_rejects_nan_and_infinity() {
        assert_eq!(Point::finite(1.0, 2.0), Some(Point::new(1.0, 2.0)));
        assert!(Point::finite(f64::NAN, 0.0).is_none());
        assert!(Point::finite(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn stroke_kind_serializes_with_label() {
        let json = serde_json::to_string(&StrokeKind::Symbol("X".into())).unwrap();
        assert_eq!(json, r#"{"type":"Symbol","label":"X"}"#);
        let kind: StrokeKind = serde_json::from_str(r#"{"type":"FreeLine"}"#).unwrap();
        assert_eq!(kind, StrokeKind::FreeLine);
    }
}
