use eframe::egui;

use crate::config::AnalysisConfig;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SoilMoistApp {
    pub state: AppState,
}

impl SoilMoistApp {
    /// Build the app and load the configured dataset right away.
    pub fn new(config: AnalysisConfig) -> Self {
        let path = config.dataset_path.clone();
        let mut state = AppState::new(config);
        state.load_dataset(&path);
        Self { state }
    }
}

impl eframe::App for SoilMoistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection + series table ----
        egui::SidePanel::left("selection_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: figure ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure(ui, &self.state);
        });
    }
}
