//! Native window preview of the backdrop (`--features preview`)
//!
//! Draws the same field through an egui painter and rebuilds it whenever the
//! window is resized, like the page does on `resize`.

mod surface;

pub use surface::PainterSurface;

use eframe::egui;
use rand::rngs::SmallRng;

use crate::core::{entropy_rng, CancellationToken, Field, FrameSupervisor, FrameVerdict, Viewport};
use crate::theme::{colors, preview_visuals, to_color32};
use crate::time::FrameRateMeter;
use tracing::info;

pub struct PreviewApp {
    field: Field,
    rng: SmallRng,
    supervisor: FrameSupervisor,
    fps: FrameRateMeter,
    show_stats: bool,
}

impl PreviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(preview_visuals());

        let mut rng = entropy_rng();
        let field = Field::new(Viewport::default(), &mut rng);
        Self {
            field,
            rng,
            supervisor: FrameSupervisor::new(CancellationToken::new()),
            fps: FrameRateMeter::default(),
            show_stats: true,
        }
    }

    fn draw_stats(&self, painter: &egui::Painter, rect: egui::Rect) {
        let stats = self.supervisor.last_stats();
        let text = format!(
            "{:.0} fps / {} nodes / {} packets / {} links",
            self.fps.fps(),
            stats.nodes,
            self.field.packet_count(),
            stats.connections,
        );
        painter.text(
            rect.left_top() + egui::vec2(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            text,
            egui::FontId::monospace(11.0),
            to_color32(colors::NODE.with_alpha(0.6)),
        );
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.show_stats = !self.show_stats;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(to_color32(colors::PREVIEW_BG)))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let viewport = Viewport::new(rect.width() as f64, rect.height() as f64);
                if viewport != self.field.viewport() {
                    info!(width = viewport.width, height = viewport.height, "Window resized");
                    self.field.resize(viewport, &mut self.rng);
                }

                let painter = ui.painter_at(rect);
                if self.supervisor.should_run() {
                    let mut surface = PainterSurface::new(&painter, rect.min);
                    let outcome = self.field.frame(&mut self.rng, &mut surface);
                    self.fps.tick();
                    if self.supervisor.record(outcome) == FrameVerdict::Continue {
                        ctx.request_repaint();
                    }
                }

                if self.show_stats {
                    self.draw_stats(&painter, rect);
                }
            });
    }
}
