use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, Window};

use crate::error::WebError;

const REFRESH_MS: i32 = 1000;

/// Show the local time in `element`, refreshed every second.
pub fn start(window: &Window, element: HtmlElement) -> Result<(), WebError> {
    let update = move || {
        let now = js_sys::Date::new_0();
        element.set_text_content(Some(&locale_string(&now, "toLocaleTimeString")));
    };
    update();

    let callback = Closure::<dyn FnMut()>::new(update);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        REFRESH_MS,
    )?;
    // The interval runs for the life of the page.
    callback.forget();
    Ok(())
}

/// Creation stamp for a new message, e.g. "2024/5/1 12:00:00".
pub fn now_locale_string() -> String {
    locale_string(&js_sys::Date::new_0(), "toLocaleString")
}

/// Call a zero-argument `Date.prototype` locale formatter, so the browser's
/// default locale and options apply.
fn locale_string(date: &js_sys::Date, method: &str) -> String {
    js_sys::Reflect::get(date, &JsValue::from_str(method))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
        .and_then(|f| f.call0(date).ok())
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| String::from(date.to_iso_string()))
}
