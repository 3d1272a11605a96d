//! `DrawSurface` over an egui painter

use eframe::egui;

use crate::core::{DrawSurface, Point, Rgba, SurfaceError};
use crate::theme::{colors, to_color32};

/// Field coordinates are relative to `origin` (the panel's top-left corner)
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32, p.y as f32)
    }
}

impl DrawSurface for PainterSurface<'_> {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), SurfaceError> {
        let rect = egui::Rect::from_min_size(self.origin, egui::vec2(width as f32, height as f32));
        self.painter
            .rect_filled(rect, 0.0, to_color32(colors::PREVIEW_BG));
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), SurfaceError> {
        self.painter
            .circle_filled(self.pos(center), radius as f32, to_color32(color));
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    ) -> Result<(), SurfaceError> {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            egui::Stroke::new(width as f32, to_color32(color)),
        );
        Ok(())
    }
}
