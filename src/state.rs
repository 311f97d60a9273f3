use std::path::Path;

use anyhow::Result;

use crate::analysis::{self, Analysis};
use crate::config::AnalysisConfig;
use crate::data::export::export_csv;
use crate::data::loader::load_file;
use crate::data::model::GriddedDataset;
use crate::data::units::normalize_temperature;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Settings edited in the side panel; applied on "Apply".
    pub config: AnalysisConfig,

    /// Loaded dataset, temperature already in °C when the file used Kelvin.
    pub dataset: Option<GriddedDataset>,

    /// Result of the last successful run, with the settings it used.
    pub analysis: Option<Analysis>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            dataset: None,
            analysis: None,
            status_message: None,
        }
    }

    /// Load `path` with the configured variable names and run the analysis.
    pub fn load_dataset(&mut self, path: &Path) {
        self.config.dataset_path = path.to_path_buf();
        match load_file(path, &self.config.variables()) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.dataset = None;
                self.analysis = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset: normalize units, then analyse.
    pub fn set_dataset(&mut self, mut dataset: GriddedDataset) {
        match normalize_temperature(&mut dataset, &self.config.temperature_var) {
            Ok(true) => log::info!("Converted '{}' from K to °C", self.config.temperature_var),
            Ok(false) => {}
            Err(e) => {
                log::error!("{e}");
                self.status_message = Some(format!("Error: {e}"));
                self.analysis = None;
                self.dataset = None;
                return;
            }
        }
        self.dataset = Some(dataset);
        self.run_analysis();
    }

    /// Re-run selection and fits with the current settings.
    pub fn run_analysis(&mut self) {
        let Some(dataset) = &self.dataset else {
            self.status_message = Some("No dataset loaded.".to_string());
            return;
        };
        match analysis::run(dataset, &self.config) {
            Ok(result) => {
                self.analysis = Some(result);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Analysis failed: {e}");
                self.analysis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Write the current series to `path` as CSV.
    pub fn export_series(&mut self, path: &Path) -> Result<()> {
        let Some(analysis) = &self.analysis else {
            anyhow::bail!("nothing to export");
        };
        let rows = analysis.series.len();
        match export_csv(path, &analysis.series) {
            Ok(()) => {
                self.status_message = Some(format!("Exported {rows} rows to {}", path.display()));
                Ok(())
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }
}
