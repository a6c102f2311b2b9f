//! PDF Viewer - egui-based UI

mod app;
mod config;
mod engine;
mod keymap;
mod logging;

use anyhow::anyhow;
use app::PdfViewerApp;
use clap::Parser;
use config::AppConfig;
use eframe::egui;
use viewer_core::Viewer;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init()?;

    let viewer = Viewer::new(engine::select(&config)?);
    let startup_file = config.file;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([480.0, 320.0])
            .with_title("PDF Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Viewer",
        options,
        Box::new(|cc| Ok(Box::new(PdfViewerApp::new(cc, viewer, startup_file)))),
    )
    .map_err(|err| anyhow!("viewer window failed: {err}"))
}
