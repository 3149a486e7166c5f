use std::cell::RefCell;
use std::rc::Rc;

use earth_engine::{InputEvent, PointerButton};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, PointerEvent, WheelEvent, Window};

use crate::dom::board::listen;
use crate::error::WebError;

/// Window size in CSS pixels and the raw device pixel ratio.
pub fn window_size(window: &Window) -> (f32, f32, f32) {
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    (
        dimension(window.inner_width()),
        dimension(window.inner_height()),
        window.device_pixel_ratio() as f32,
    )
}

/// Forward window resizes and canvas pointer/wheel input to the runner.
pub fn install(window: &Window, canvas: &HtmlCanvasElement) -> Result<(), WebError> {
    let resize_window = window.clone();
    listen(window, "resize", move |_| {
        let (width, height, dpr) = window_size(&resize_window);
        crate::with_runner(|runner| runner.resize(width, height, dpr));
    })?;

    // Drags must not scroll or zoom the page on touch screens.
    canvas.style().set_property("touch-action", "none")?;

    let capture = canvas.clone();
    listen(canvas, "pointerdown", move |event| {
        let Some(event) = event.dyn_ref::<PointerEvent>() else { return };
        if let Err(err) = capture.set_pointer_capture(event.pointer_id()) {
            log::debug!("input: pointer capture refused: {}", crate::error::js_message(&err));
        }
        let (x, y) = position(event);
        push(InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(event.button()),
        });
    })?;

    listen(canvas, "pointermove", |event| {
        if let Some(event) = event.dyn_ref::<PointerEvent>() {
            let (x, y) = position(event);
            push(InputEvent::PointerMove { x, y });
        }
    })?;

    for kind in ["pointerup", "pointercancel"] {
        listen(canvas, kind, |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                let (x, y) = position(event);
                push(InputEvent::PointerUp { x, y });
            }
        })?;
    }

    listen(canvas, "wheel", |event| {
        event.prevent_default();
        if let Some(event) = event.dyn_ref::<WheelEvent>() {
            push(InputEvent::Wheel {
                delta_y: event.delta_y() as f32,
            });
        }
    })?;

    // Right-drag pans instead of opening the menu.
    listen(canvas, "contextmenu", |event| event.prevent_default())?;
    Ok(())
}

fn position(event: &PointerEvent) -> (f32, f32) {
    (event.client_x() as f32, event.client_y() as f32)
}

fn push(event: InputEvent) {
    crate::with_runner(|runner| runner.push_input(event));
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Run `runner.tick` on every animation frame for the life of the page.
pub fn start_animation_loop(window: &Window) -> Result<(), WebError> {
    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let frame_window = window.clone();

    *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        crate::with_runner(|runner| runner.tick(timestamp));
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = frame_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("loop: stopped: {}", crate::error::js_message(&err));
            }
        }
    }));

    let first = slot.borrow();
    if let Some(callback) = first.as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
