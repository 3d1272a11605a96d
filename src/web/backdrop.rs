//! Animated network background
//!
//! Owns the canvas, the field and the `requestAnimationFrame` loop. The loop
//! re-schedules itself until its `CancellationToken` is cancelled (teardown or
//! too many failed frames). Resizing the window rebuilds the field.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

use super::canvas::{self, CanvasSurface};
use super::{describe_js, BackdropError, Listener};
use crate::core::config::CanvasConfig;
use crate::core::{
    entropy_rng, CancellationToken, Field, FrameSupervisor, FrameVerdict, Viewport,
};

struct BackdropState {
    field: Field,
    rng: SmallRng,
    surface: CanvasSurface,
    supervisor: FrameSupervisor,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct Backdrop {
    window: Window,
    token: CancellationToken,
    frame_callback: FrameCallback,
    /// Id of the pending animation frame request
    pending_frame: Rc<Cell<Option<i32>>>,
    _on_resize: Listener,
}

/// Current `innerWidth × innerHeight`
fn viewport_of(window: &Window) -> Result<Viewport, BackdropError> {
    let width = window
        .inner_width()
        .map_err(|e| BackdropError::Js(describe_js(&e)))?
        .as_f64()
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .map_err(|e| BackdropError::Js(describe_js(&e)))?
        .as_f64()
        .unwrap_or(0.0);
    Ok(Viewport::new(width, height))
}

/// Match the canvas backing store to the viewport
fn fit_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
    canvas.set_width(viewport.width.max(0.0) as u32);
    canvas.set_height(viewport.height.max(0.0) as u32);
}

fn request_frame(
    window: &Window,
    callback: &FrameCallback,
    pending: &Cell<Option<i32>>,
) -> Result<(), JsValue> {
    if let Some(cb) = callback.borrow().as_ref() {
        let id = window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        pending.set(Some(id));
    }
    Ok(())
}

impl Backdrop {
    /// Bind the canvas, build the field and start animating.
    ///
    /// Fails without side effects on the page when the canvas or its 2D
    /// context is unavailable.
    pub fn start(
        window: &Window,
        document: &Document,
        config: &CanvasConfig,
    ) -> Result<Self, BackdropError> {
        let (canvas, ctx) = canvas::acquire(document, &config.element_id)?;

        let viewport = viewport_of(window)?;
        fit_canvas(&canvas, viewport);

        let mut rng = entropy_rng();
        let field = Field::new(viewport, &mut rng);
        let token = CancellationToken::new();

        info!(
            width = viewport.width,
            height = viewport.height,
            nodes = field.nodes().len(),
            "Backdrop started"
        );

        let state = Rc::new(RefCell::new(BackdropState {
            field,
            rng,
            surface: CanvasSurface::new(ctx),
            supervisor: FrameSupervisor::new(token.clone()),
        }));

        // Resize: rebuild the field for the new viewport
        let on_resize = {
            let state = state.clone();
            let win = window.clone();
            Listener::new(window.as_ref(), "resize", move |_| {
                let viewport = match viewport_of(&win) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(error = %e, "Cannot read viewport size");
                        return;
                    }
                };
                fit_canvas(&canvas, viewport);
                let mut s = state.borrow_mut();
                let BackdropState { field, rng, .. } = &mut *s;
                field.resize(viewport, rng);
            })
            .map_err(|e| BackdropError::Js(describe_js(&e)))?
        };

        // Frame loop
        let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending_frame = Rc::new(Cell::new(None));
        {
            let next = frame_callback.clone();
            let pending = pending_frame.clone();
            let window = window.clone();
            *frame_callback.borrow_mut() = Some(Closure::new(move || {
                pending.set(None);

                let verdict = {
                    let mut s = state.borrow_mut();
                    if !s.supervisor.should_run() {
                        FrameVerdict::Stop
                    } else {
                        let BackdropState {
                            field,
                            rng,
                            surface,
                            supervisor,
                        } = &mut *s;
                        let outcome = field.frame(rng, surface);
                        supervisor.record(outcome)
                    }
                };

                match verdict {
                    FrameVerdict::Continue => {
                        if let Err(e) = request_frame(&window, &next, &pending) {
                            warn!(error = %describe_js(&e), "Cannot schedule next frame");
                        }
                    }
                    FrameVerdict::Stop => {
                        let frames = state.borrow().supervisor.frames();
                        debug!(frames, "Backdrop loop stopped");
                        // Releases this closure and the state it holds
                        let _ = next.borrow_mut().take();
                    }
                }
            }));
        }

        request_frame(window, &frame_callback, &pending_frame)
            .map_err(|e| BackdropError::Js(describe_js(&e)))?;

        Ok(Self {
            window: window.clone(),
            token,
            frame_callback,
            pending_frame,
            _on_resize: on_resize,
        })
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(id) = self.pending_frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        let _ = self.frame_callback.borrow_mut().take();
        debug!("Backdrop torn down");
    }
}
