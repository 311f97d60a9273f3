mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::SoilMoistApp;
use config::{AnalysisConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let mut config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
        log::error!("Ignoring {CONFIG_FILE}: {e:#}");
        AnalysisConfig::default()
    });
    if let Some(path) = std::env::args_os().nth(1) {
        config.dataset_path = PathBuf::from(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 700.0])
            .with_min_inner_size([800.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Soil Moisture vs Temperature",
        options,
        Box::new(|_cc| Ok(Box::new(SoilMoistApp::new(config)))),
    )
}
