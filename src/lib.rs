//! Portfolio backdrop - client-side behaviour of a single-page portfolio
//!
//! - Animated network background: drifting nodes, proximity lines and packets
//!   travelling between nodes, drawn on a full-viewport canvas
//! - Reveal-on-scroll and icon initialisation
//! - Chat assistant backed by Gemini, with a scripted fallback when no API key is set
//!
//! The `core` module is platform-agnostic; the browser build (`--features wasm`,
//! `wasm32` target) wires it to the DOM, the `cli` and `preview` features drive
//! it natively.

pub mod core;
pub mod theme;
pub mod time;

#[cfg(feature = "preview")]
pub mod preview;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    web::start();
}
