//! Drawing surface abstraction for the particle field
//!
//! The field issues three primitives: clear, filled circle and stroked line.
//! The browser build binds them to a `CanvasRenderingContext2d`, the native
//! preview to an egui painter, and tests record them.

use super::geometry::Point;

/// Failure reported by a drawing backend
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("drawing call `{op}` failed: {reason}")]
    Draw { op: &'static str, reason: String },
    #[error("drawing surface is no longer available")]
    Detached,
}

/// sRGB colour with a straight (non-premultiplied) alpha in `[0, 1]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same colour with a different opacity (clamped to `[0, 1]`)
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS colour string: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Target of the field's per-frame drawing
pub trait DrawSurface {
    /// Erase a `width × height` region anchored at the origin
    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError>;

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    ) -> Result<(), SurfaceError>;
}

/// One recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Circle { center: Point, radius: f64, color: Rgba },
    Line { from: Point, to: Point, color: Rgba, width: f64 },
}

/// In-memory surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded calls
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of line strokes recorded since the last `take`
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count()
    }

    /// Number of filled circles recorded since the last `take`
    pub fn circle_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Circle { .. }))
            .count()
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Clear { width, height });
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Circle { center, radius, color });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    ) -> Result<(), SurfaceError> {
        self.ops.push(DrawOp::Line { from, to, color, width });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_formatting() {
        assert_eq!(Rgba::rgb(203, 213, 225).to_css(), "#cbd5e1");
        assert_eq!(Rgba::rgb(59, 130, 246).to_css(), "#3b82f6");
        assert_eq!(
            Rgba::rgb(59, 130, 246).with_alpha(0.05).to_css(),
            "rgba(59, 130, 246, 0.05)"
        );
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(Rgba::rgb(0, 0, 0).with_alpha(-0.2).a, 0.0);
        assert_eq!(Rgba::rgb(0, 0, 0).with_alpha(3.0).a, 1.0);
    }

    #[test]
    fn test_recording_surface_counts_and_take() {
        let mut surface = RecordingSurface::new();
        surface.clear(10.0, 10.0).unwrap();
        surface
            .fill_circle(Point::new(1.0, 1.0), 2.0, Rgba::rgb(1, 2, 3))
            .unwrap();
        surface
            .stroke_line(Point::default(), Point::new(5.0, 5.0), Rgba::rgb(1, 2, 3), 1.0)
            .unwrap();

        assert_eq!(surface.circle_count(), 1);
        assert_eq!(surface.line_count(), 1);
        assert_eq!(surface.take().len(), 3);
        assert!(surface.ops().is_empty());
    }
}
