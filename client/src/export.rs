use chrono::{DateTime, Utc};
use js_sys::Promise;
use thiserror::Error;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, HtmlCanvasElement, HtmlFormElement, HtmlImageElement, Window};

use paindraw_shared::{composite, download_filename, ExportRequest, Stroke};

use crate::net::{submit_export, trigger_download};
use crate::render::CanvasSurface;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("background image {0} could not be loaded")]
    Background(String),
    #[error("compositing failed: {0}")]
    Canvas(String),
    #[error("request could not be encoded: {0}")]
    Encode(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("download failed: {0}")]
    Download(String),
}

pub fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Resolves once the image has decoded; a load error rejects instead of
/// leaving an empty background.
pub async fn load_image(src: &str) -> Result<HtmlImageElement, ExportError> {
    let image = HtmlImageElement::new().map_err(|error| ExportError::Canvas(describe(&error)))?;
    let loaded = Promise::new(&mut |resolve, reject| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(src);
    let result = JsFuture::from(loaded).await;
    image.set_onload(None);
    image.set_onerror(None);
    result.map_err(|_| ExportError::Background(src.to_string()))?;
    Ok(image)
}

/// Draws the background and every committed stroke onto the off-screen
/// canvas and returns it as a PNG data URL.
pub async fn merge_canvases(
    merged: &HtmlCanvasElement,
    background_src: &str,
    strokes: &[Stroke],
) -> Result<String, ExportError> {
    let background = load_image(background_src).await?;
    let mut surface = CanvasSurface::for_canvas(merged.clone())
        .map_err(|error| ExportError::Canvas(describe(&error)))?;
    composite(&mut surface, &background, strokes)
        .map_err(|error| ExportError::Canvas(describe(&error)))?;
    surface
        .to_data_url()
        .map_err(|error| ExportError::Canvas(describe(&error)))
}

fn form_text(data: &FormData, field: &str) -> Option<String> {
    data.get(field)
        .as_string()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Builds the request body from the form. Fields the page does not have are
/// left out.
pub fn collect_request(form: &HtmlFormElement, image: String) -> ExportRequest {
    let mut request = ExportRequest::new(image);
    if let Ok(data) = FormData::new_with_form(form) {
        request.name = form_text(&data, "name");
        request.date = form_text(&data, "date");
        request.dob = form_text(&data, "dob");
        request.examiner = form_text(&data, "examiner");
    }
    request
}

pub struct ExportJob {
    pub window: Window,
    pub form: HtmlFormElement,
    pub merged: HtmlCanvasElement,
    pub background_src: String,
    pub strokes: Vec<Stroke>,
}

/// Composites, submits and downloads. Returns the filename on success; the
/// caller owns all session bookkeeping.
pub async fn run_export(job: ExportJob) -> Result<String, ExportError> {
    let image = merge_canvases(&job.merged, &job.background_src, &job.strokes).await?;
    let request = collect_request(&job.form, image);
    log::info!(
        "submitting export with {} strokes and {} text fields",
        job.strokes.len(),
        request.text_fields().len()
    );
    let blob = submit_export(&job.window, &request).await?;

    let now = DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default();
    let filename = download_filename(now);
    let document = job
        .window
        .document()
        .ok_or_else(|| ExportError::Download("Missing document".to_string()))?;
    trigger_download(&document, &blob, &filename)
        .map_err(|error| ExportError::Download(describe(&error)))?;
    Ok(filename)
}
