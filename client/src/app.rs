use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, HtmlButtonElement, HtmlCanvasElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent, TouchEvent,
};

use paindraw_shared::FREE_LINE_VALUE;

use crate::actions::{
    end_stroke, extend_stroke, finish_export, redo, select_kind, start_stroke, undo,
    Shortcut,
};
use crate::dom::{event_to_point, get_element, mouse_sample, set_status, touch_sample};
use crate::export::{run_export, ExportJob};
use crate::render::CanvasSurface;
use crate::state::{State, DEFAULT_BACKGROUND};

fn document_ready_state(document: &web_sys::Document) -> Option<String> {
    Reflect::get(document.as_ref(), &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(error) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {error}").into());
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;
    let started = Rc::new(Cell::new(false));

    if document_ready_state(&document).as_deref() != Some("loading") {
        started.set(true);
        return start_app();
    }

    let onload_started = started.clone();
    let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
        if onload_started.replace(true) {
            return;
        }
        if let Err(err) = start_app() {
            log::error!("startup failed: {err:?}");
        }
    });
    document.add_event_listener_with_callback(
        "DOMContentLoaded",
        onload.as_ref().unchecked_ref(),
    )?;
    onload.forget();

    Ok(())
}

fn start_app() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "draw")?;
    let merged: HtmlCanvasElement = get_element(&document, "merged")?;
    let stroke_type: HtmlSelectElement = get_element(&document, "stroke-type")?;
    let form: HtmlFormElement = get_element(&document, "pain-form")?;
    let undo_button: HtmlButtonElement = get_element(&document, "undo")?;
    let redo_button: HtmlButtonElement = get_element(&document, "redo")?;
    let submit_button: HtmlButtonElement = get_element(&document, "submit")?;
    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let background_src = merged
        .get_attribute("data-background")
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());

    let surface = CanvasSurface::for_canvas(canvas.clone())?;
    let state = Rc::new(RefCell::new(State::new(canvas.clone(), surface)));

    stroke_type.set_value(FREE_LINE_VALUE);
    select_kind(&mut state.borrow_mut(), FREE_LINE_VALUE);

    {
        let down_state = state.clone();
        let ondown = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if event.button() != 0 {
                return;
            }
            event.prevent_default();
            let mut state = down_state.borrow_mut();
            if let Some(point) = event_to_point(&state.canvas, &mouse_sample(&event)) {
                start_stroke(&mut state, point);
            }
        });
        canvas.add_event_listener_with_callback("mousedown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let onmove = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let mut state = move_state.borrow_mut();
            if !state.session.is_drawing() {
                return;
            }
            if let Some(point) = event_to_point(&state.canvas, &mouse_sample(&event)) {
                extend_stroke(&mut state, point);
            }
        });
        canvas.add_event_listener_with_callback("mousemove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let touch_state = state.clone();
        let ontouchstart = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();
            let mut state = touch_state.borrow_mut();
            if let Some(point) = event_to_point(&state.canvas, &touch_sample(&event)) {
                start_stroke(&mut state, point);
            }
        });
        canvas.add_event_listener_with_callback(
            "touchstart",
            ontouchstart.as_ref().unchecked_ref(),
        )?;
        ontouchstart.forget();
    }

    {
        let touch_state = state.clone();
        let ontouchmove = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            let mut state = touch_state.borrow_mut();
            if !state.session.is_drawing() {
                return;
            }
            if let Some(point) = event_to_point(&state.canvas, &touch_sample(&event)) {
                extend_stroke(&mut state, point);
            }
        });
        canvas
            .add_event_listener_with_callback("touchmove", ontouchmove.as_ref().unchecked_ref())?;
        ontouchmove.forget();
    }

    {
        let stop_state = state.clone();
        let onstop = Closure::<dyn FnMut(Event)>::new(move |_| {
            end_stroke(&mut stop_state.borrow_mut());
        });
        for name in ["mouseup", "mouseout", "touchend", "touchcancel"] {
            canvas.add_event_listener_with_callback(name, onstop.as_ref().unchecked_ref())?;
        }
        onstop.forget();
    }

    {
        let select_state = state.clone();
        let select = stroke_type.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            select_kind(&mut select_state.borrow_mut(), &select.value());
        });
        stroke_type.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let undo_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            undo(&mut undo_state.borrow_mut());
        });
        undo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let redo_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            redo(&mut redo_state.borrow_mut());
        });
        redo_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let key_state = state.clone();
        let onkeydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let editing_text = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .is_some();
            if editing_text {
                return;
            }
            let command = event.ctrl_key() || event.meta_key();
            let Some(shortcut) = Shortcut::from_key(&event.key(), command, event.shift_key())
            else {
                return;
            };
            event.prevent_default();
            let mut state = key_state.borrow_mut();
            match shortcut {
                Shortcut::Undo => undo(&mut state),
                Shortcut::Redo => redo(&mut state),
            }
        });
        window.add_event_listener_with_callback("keydown", onkeydown.as_ref().unchecked_ref())?;
        onkeydown.forget();
    }

    {
        let submit_state = state.clone();
        let submit_window = window.clone();
        let submit_form = form.clone();
        let onsubmit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let Some(strokes) = submit_state.borrow_mut().session.begin_export() else {
                log::info!("export already in flight, ignoring submit");
                return;
            };
            submit_button.set_disabled(true);
            set_status(&status_el, "busy", "Preparing PDF...");

            let job = ExportJob {
                window: submit_window.clone(),
                form: submit_form.clone(),
                merged: merged.clone(),
                background_src: background_src.clone(),
                strokes,
            };
            let state = submit_state.clone();
            let form = submit_form.clone();
            let stroke_type = stroke_type.clone();
            let submit_button = submit_button.clone();
            let status_el = status_el.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = run_export(job).await;
                let mut state = state.borrow_mut();
                match result {
                    Ok(filename) => {
                        log::info!("downloaded {filename}");
                        form.reset();
                        finish_export(&mut state, true);
                        select_kind(&mut state, &stroke_type.value());
                        set_status(&status_el, "ready", &format!("Saved {filename}"));
                    }
                    Err(error) => {
                        log::error!("export failed: {error}");
                        finish_export(&mut state, false);
                        set_status(&status_el, "error", &format!("Export failed: {error}"));
                    }
                }
                submit_button.set_disabled(false);
            });
        });
        form.add_event_listener_with_callback("submit", onsubmit.as_ref().unchecked_ref())?;
        onsubmit.forget();
    }

    log::info!(
        "pain drawing ready on a {}x{} canvas",
        canvas.width(),
        canvas.height()
    );
    Ok(())
}
