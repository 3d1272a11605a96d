//! Optional icon library (`window.lucide`)

use js_sys::{Function, Reflect};
use tracing::{debug, error};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

use super::describe_js;

/// Page-provided icon library exposing `createIcons()`
struct IconLibrary {
    lib: JsValue,
    create_icons: Function,
}

impl IconLibrary {
    fn detect(window: &Window) -> Option<Self> {
        let lib = Reflect::get(window.as_ref(), &JsValue::from_str("lucide")).ok()?;
        if lib.is_undefined() || lib.is_null() {
            return None;
        }
        let create_icons = Reflect::get(&lib, &JsValue::from_str("createIcons"))
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        Some(Self { lib, create_icons })
    }

    fn create_icons(&self) -> Result<(), JsValue> {
        self.create_icons.call0(&self.lib).map(|_| ())
    }
}

/// Replace icon placeholders when the library is loaded; no-op otherwise
pub fn init_icons(window: &Window) {
    match IconLibrary::detect(window) {
        Some(lib) => match lib.create_icons() {
            Ok(()) => debug!("Icons initialized"),
            Err(e) => error!(error = %describe_js(&e), "Icon loading failed"),
        },
        None => debug!("No icon library on the page"),
    }
}
