//! Optional markdown renderer (`window.marked`)

use js_sys::{Function, Reflect};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use super::describe_js;
use crate::core::markup::{MarkupRenderer, PlainTextRenderer};

pub struct MarkedRenderer {
    marked: JsValue,
    parse: Function,
}

impl MarkedRenderer {
    /// `None` when the page did not load marked
    pub fn detect(window: &Window) -> Option<Self> {
        let marked = Reflect::get(window.as_ref(), &JsValue::from_str("marked")).ok()?;
        if marked.is_undefined() || marked.is_null() {
            return None;
        }
        let parse = Reflect::get(&marked, &JsValue::from_str("parse"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { marked, parse })
    }
}

impl MarkupRenderer for MarkedRenderer {
    fn render(&self, text: &str) -> String {
        match self.parse.call1(&self.marked, &JsValue::from_str(text)) {
            Ok(html) => html.as_string().unwrap_or_else(|| {
                // async mode returns a Promise
                warn!("marked.parse did not return a string");
                PlainTextRenderer.render(text)
            }),
            Err(e) => {
                warn!(error = %describe_js(&e), "marked.parse failed");
                PlainTextRenderer.render(text)
            }
        }
    }
}
