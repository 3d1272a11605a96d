//! Browser wiring: reveal-on-scroll, icons, the animated backdrop and the chat widget
//!
//! Each feature starts independently and fails closed: an error is logged and
//! the rest of the page keeps working.

mod backdrop;
mod canvas;
mod chat;
mod icons;
mod markdown;
mod reveal;

use std::cell::RefCell;

use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, PageTransitionEvent};

use crate::core::config::CONFIG_ELEMENT_ID;
use crate::core::SiteConfig;
use backdrop::Backdrop;
use chat::ChatWidget;
use reveal::RevealObserver;

#[derive(Debug, thiserror::Error)]
pub enum BackdropError {
    #[error("no global window")]
    NoWindow,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("element #{0} is not a canvas")]
    NotACanvas(String),
    #[error("2D context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("JS error: {0}")]
    Js(String),
}

/// Human-readable form of a thrown JS value
pub(crate) fn describe_js(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

/// DOM event listener removed again when dropped
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, f: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Everything running on the page; dropped on unload
struct Page {
    _reveal: Option<RevealObserver>,
    _backdrop: Option<Backdrop>,
    _chat: Option<ChatWidget>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Inline JSON config, defaults when absent or invalid
fn load_config(document: &Document) -> SiteConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        debug!("No inline config, using defaults");
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&json) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Ignoring inline config");
            SiteConfig::default()
        }
    }
}

/// Page entry point
pub fn start() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();

    let Some(window) = web_sys::window() else {
        error!(error = %BackdropError::NoWindow, "Page scripts disabled");
        return;
    };
    let Some(document) = window.document() else {
        error!("No document, page scripts disabled");
        return;
    };

    let config = load_config(&document);

    let reveal = match RevealObserver::observe(&document, &config.reveal) {
        Ok(r) => Some(r),
        Err(e) => {
            error!(error = %describe_js(&e), "Scroll reveal failed");
            None
        }
    };

    icons::init_icons(&window);

    let backdrop = if config.canvas.enabled {
        match Backdrop::start(&window, &document, &config.canvas) {
            Ok(b) => Some(b),
            Err(e) => {
                error!(error = %e, "Canvas animation failed");
                None
            }
        }
    } else {
        None
    };

    let chat = match ChatWidget::mount(&window, &document, &config.chat) {
        Ok(c) => Some(c),
        Err(e) => {
            error!(error = %describe_js(&e), "Chat widget disabled");
            None
        }
    };

    info!(
        backdrop = backdrop.is_some(),
        chat = chat.is_some(),
        "Page scripts ready"
    );

    PAGE.with(|page| {
        *page.borrow_mut() = Some(Page {
            _reveal: reveal,
            _backdrop: backdrop,
            _chat: chat,
        });
    });

    // Tear down on real unloads; a page kept in the back/forward cache keeps running
    let on_pagehide = Closure::wrap(Box::new(move |e: Event| {
        let persisted = e
            .dyn_ref::<PageTransitionEvent>()
            .map(|e| e.persisted())
            .unwrap_or(false);
        if persisted {
            return;
        }
        PAGE.with(|page| page.borrow_mut().take());
    }) as Box<dyn FnMut(Event)>);
    if let Err(e) =
        window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())
    {
        warn!(error = %describe_js(&e), "Cannot register pagehide teardown");
    }
    on_pagehide.forget();
}
