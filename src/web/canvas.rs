//! `DrawSurface` over a 2D canvas context

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{describe_js, BackdropError};
use crate::core::{DrawSurface, Point, Rgba, SurfaceError};

/// Look up `element_id` and bind its 2D context
pub fn acquire(
    document: &Document,
    element_id: &str,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), BackdropError> {
    let canvas = document
        .get_element_by_id(element_id)
        .ok_or_else(|| BackdropError::MissingElement(element_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| BackdropError::NotACanvas(element_id.to_string()))?;

    let context = canvas
        .get_context("2d")
        .map_err(|e| BackdropError::ContextUnavailable(describe_js(&e)))?
        .ok_or_else(|| BackdropError::ContextUnavailable("2d context not supported".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| BackdropError::ContextUnavailable("unexpected context type".to_string()))?;

    Ok((canvas, context))
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

fn draw_error(op: &'static str, e: JsValue) -> SurfaceError {
    SurfaceError::Draw {
        op,
        reason: describe_js(&e),
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, TAU)
            .map_err(|e| draw_error("arc", e))?;
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    ) -> Result<(), SurfaceError> {
        self.ctx.set_line_width(width);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
        Ok(())
    }
}
