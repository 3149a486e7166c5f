pub mod board;
pub mod clock;
pub mod panel;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use crate::error::{AssetError, WebError};

pub const TIME_ID: &str = "time";
pub const ADD_MESSAGE_BUTTON_ID: &str = "addMessageButton";
pub const MESSAGE_FORM_ID: &str = "messageForm";
pub const MESSAGE_INPUT_ID: &str = "messageInput";
pub const MESSAGES_ID: &str = "messages";
pub const TOGGLE_MESSAGES_BUTTON_ID: &str = "toggleMessagesButton";
pub const SUBMIT_MESSAGE_ID: &str = "submitMessage";
pub const CANVAS_SELECTOR: &str = "canvas.webgl";

/// The message draft field; pages may use either element.
#[derive(Clone)]
pub enum DraftInput {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl DraftInput {
    pub fn value(&self) -> String {
        match self {
            Self::Input(el) => el.value(),
            Self::TextArea(el) => el.value(),
        }
    }

    pub fn clear(&self) {
        match self {
            Self::Input(el) => el.set_value(""),
            Self::TextArea(el) => el.set_value(""),
        }
    }
}

/// Every element the page must provide, resolved once at startup.
#[derive(Clone)]
pub struct Elements {
    pub time: HtmlElement,
    pub add_message_button: HtmlElement,
    pub message_form: HtmlElement,
    pub message_input: DraftInput,
    pub messages: HtmlElement,
    pub toggle_messages_button: HtmlElement,
    pub submit_message: HtmlElement,
    pub canvas: HtmlCanvasElement,
}

impl Elements {
    /// Fails on the first missing element, naming it.
    pub fn locate(document: &Document) -> Result<Self, WebError> {
        let input = by_id(document, MESSAGE_INPUT_ID)?;
        let message_input = match input.dyn_into::<HtmlInputElement>() {
            Ok(el) => DraftInput::Input(el),
            Err(other) => DraftInput::TextArea(other.dyn_into::<HtmlTextAreaElement>().map_err(
                |_| WebError::WrongElementType {
                    id: MESSAGE_INPUT_ID,
                    expected: "text input or textarea",
                },
            )?),
        };

        let canvas = document
            .query_selector(CANVAS_SELECTOR)?
            .ok_or(WebError::MissingElement(CANVAS_SELECTOR))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| WebError::WrongElementType {
                id: CANVAS_SELECTOR,
                expected: "canvas",
            })?;

        Ok(Self {
            time: html_by_id(document, TIME_ID)?,
            add_message_button: html_by_id(document, ADD_MESSAGE_BUTTON_ID)?,
            message_form: html_by_id(document, MESSAGE_FORM_ID)?,
            message_input,
            messages: html_by_id(document, MESSAGES_ID)?,
            toggle_messages_button: html_by_id(document, TOGGLE_MESSAGES_BUTTON_ID)?,
            submit_message: html_by_id(document, SUBMIT_MESSAGE_ID)?,
            canvas,
        })
    }
}

fn by_id(document: &Document, id: &'static str) -> Result<web_sys::Element, WebError> {
    document
        .get_element_by_id(id)
        .ok_or(WebError::MissingElement(id))
}

fn html_by_id(document: &Document, id: &'static str) -> Result<HtmlElement, WebError> {
    by_id(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WebError::WrongElementType { id, expected: "HTML element" })
}

/// Set the inline `display` style.
pub fn set_display(element: &HtmlElement, display: &str) {
    if let Err(err) = element.style().set_property("display", display) {
        log::warn!("dom: could not set display: {}", crate::error::js_message(&err));
    }
}

pub const DEGRADED_INDICATOR_ID: &str = "degradedIndicator";

/// Visible notice that the globe is drawn with placeholder textures.
pub fn show_degraded(document: &Document, failures: &[AssetError]) -> Result<(), WebError> {
    let body = document.body().ok_or(WebError::MissingElement("body"))?;
    let notice = document.create_element("div")?;
    notice.set_id(DEGRADED_INDICATOR_ID);
    notice.set_attribute("role", "status")?;
    notice.set_attribute(
        "style",
        "position:fixed;bottom:12px;left:12px;padding:6px 10px;border-radius:4px;\
         background:rgba(160,40,20,0.85);color:#fff;font:12px sans-serif;z-index:10",
    )?;
    notice.set_text_content(Some(&format!(
        "{} texture(s) failed to load; showing a flat placeholder",
        failures.len()
    )));
    let detail = failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    notice.set_attribute("title", &detail)?;
    body.append_child(&notice)?;
    log::error!("assets: running degraded, {} texture(s) missing", failures.len());
    Ok(())
}
