use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, MouseEvent, TouchEvent};

use paindraw_shared::{CanvasGeometry, Point, PointerSample};

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_status(status_el: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_el.set_text_content(Some(text));
}

pub fn canvas_geometry(canvas: &HtmlCanvasElement) -> CanvasGeometry {
    let rect = canvas.get_bounding_client_rect();
    CanvasGeometry {
        left: rect.left(),
        top: rect.top(),
        display_width: rect.width(),
        display_height: rect.height(),
        backing_width: canvas.width() as f64,
        backing_height: canvas.height() as f64,
    }
}

pub fn mouse_sample(event: &MouseEvent) -> PointerSample {
    PointerSample::Pointer {
        client_x: event.client_x() as f64,
        client_y: event.client_y() as f64,
    }
}

pub fn touch_sample(event: &TouchEvent) -> PointerSample {
    let touches = event.touches();
    let positions = (0..touches.length())
        .filter_map(|index| touches.item(index))
        .map(|touch| (touch.client_x() as f64, touch.client_y() as f64))
        .collect();
    PointerSample::Touches(positions)
}

pub fn event_to_point(canvas: &HtmlCanvasElement, sample: &PointerSample) -> Option<Point> {
    canvas_geometry(canvas).map_input(sample)
}
