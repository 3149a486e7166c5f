use earth_engine::{ControlKind, PanelControl, Scene, Tweak, CONTROLS};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlInputElement};

use super::board::listen;
use crate::error::WebError;

const PANEL_STYLE: &str = "position:fixed;top:0;right:15px;width:245px;padding:6px 8px;\
    background:#1f1f1f;color:#ebebeb;font:11px sans-serif;z-index:1000";
const ROW_STYLE: &str = "display:flex;align-items:center;gap:6px;margin:4px 0";
const LABEL_STYLE: &str = "flex:0 0 40%;overflow:hidden;text-overflow:ellipsis";

/// Build the tweak panel from [`CONTROLS`], seeded with the scene's current
/// values, and append it to the body.
pub fn build(document: &Document, scene: &Scene) -> Result<(), WebError> {
    let body = document.body().ok_or(WebError::MissingElement("body"))?;
    let panel = document.create_element("div")?;
    panel.set_class_name("debug-panel");
    panel.set_attribute("style", PANEL_STYLE)?;

    for control in &CONTROLS {
        let value = scene.panel_value(control.key).unwrap_or_default();
        let row = control_row(document, control, &value)?;
        panel.append_child(&row)?;
    }

    body.append_child(&panel)?;
    Ok(())
}

fn control_row(document: &Document, control: &PanelControl, value: &str) -> Result<Element, WebError> {
    let row = document.create_element("label")?;
    row.set_attribute("style", ROW_STYLE)?;

    let name = document.create_element("span")?;
    name.set_attribute("style", LABEL_STYLE)?;
    name.set_text_content(Some(control.key));
    row.append_child(&name)?;

    let input = document
        .create_element("input")?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| WebError::WrongElementType { id: control.key, expected: "input" })?;

    let readout = match control.kind {
        ControlKind::Color => {
            input.set_type("color");
            None
        }
        ControlKind::Slider { min, max, step } => {
            input.set_type("range");
            input.set_min(&min.to_string());
            input.set_max(&max.to_string());
            input.set_step(&step.to_string());
            input.set_attribute("style", "flex:1")?;
            let readout = document.create_element("span")?;
            readout.set_text_content(Some(&format_slider(value)));
            Some(readout)
        }
    };
    input.set_value(value);
    row.append_child(&input)?;
    if let Some(readout) = &readout {
        row.append_child(readout)?;
    }

    let key = control.key;
    let field = input.clone();
    listen(&input, "input", move |_: Event| {
        let raw = field.value();
        match Tweak::parse(key, &raw) {
            Ok(tweak) => {
                crate::with_runner(|runner| runner.apply_tweak(tweak));
                if let Some(readout) = &readout {
                    readout.set_text_content(Some(&format_slider(&raw)));
                }
            }
            Err(err) => log::warn!("panel: {err}"),
        }
    })?;

    Ok(row)
}

fn format_slider(raw: &str) -> String {
    raw.parse::<f32>()
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_readout_has_three_decimals() {
        assert_eq!(format_slider("1.5707963"), "1.571");
        assert_eq!(format_slider("-3"), "-3.000");
        assert_eq!(format_slider("abc"), "abc");
    }
}
