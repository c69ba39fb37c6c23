use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Document, HtmlAnchorElement, Request, RequestInit, Response, Url, Window};

use paindraw_shared::ExportRequest;

use crate::export::{describe, ExportError};

pub const SUBMIT_PATH: &str = "/submit";

fn network(error: JsValue) -> ExportError {
    ExportError::Network(describe(&error))
}

/// Posts the export payload and returns the PDF body.
pub async fn submit_export(window: &Window, payload: &ExportRequest) -> Result<Blob, ExportError> {
    let body =
        serde_json::to_string(payload).map_err(|error| ExportError::Encode(error.to_string()))?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(SUBMIT_PATH, &init).map_err(network)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(network)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(ExportError::Status(response.status()));
    }
    JsFuture::from(response.blob().map_err(network)?)
        .await
        .map_err(network)?
        .dyn_into::<Blob>()
        .map_err(network)
}

/// Saves `blob` through a temporary anchor so the browser names the file.
pub fn trigger_download(document: &Document, blob: &Blob, filename: &str) -> Result<(), JsValue> {
    let url = Url::create_object_url_with_blob(blob)?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Missing body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)
}
