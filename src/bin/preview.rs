//! Native preview window for the portfolio backdrop
//!
//! Run with: cargo run --features preview --bin portfolio-preview
//! Press `S` to toggle the stats overlay.

use eframe::egui;
use portfolio_backdrop::preview::PreviewApp;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portfolio_backdrop=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Portfolio backdrop"),
        ..Default::default()
    };

    eframe::run_native(
        "portfolio-preview",
        options,
        Box::new(|cc| Ok(Box::new(PreviewApp::new(cc)))),
    )
}
