//! Reveal-on-scroll: add the active class once an element scrolls into view

use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::core::config::RevealConfig;

pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
}

impl RevealObserver {
    /// Observe every element matching `config.selector`
    pub fn observe(document: &Document, config: &RevealConfig) -> Result<Self, JsValue> {
        let active_class = config.active_class.clone();
        let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if entry.is_intersecting() {
                    let _ = entry.target().class_list().add_1(&active_class);
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

        let targets = document.query_selector_all(&config.selector)?;
        let mut observed = 0u32;
        for i in 0..targets.length() {
            if let Some(el) = targets.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                observer.observe(&el);
                observed += 1;
            }
        }
        debug!(selector = %config.selector, observed, "Scroll reveal armed");

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
