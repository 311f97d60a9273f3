use eframe::egui::{self, Color32, DragValue, RichText, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::data::model::MoistureLayer;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection controls and series table
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    egui::Grid::new("selection_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Place");
            ui.text_edit_singleline(&mut state.config.place);
            ui.end_row();

            ui.label("From");
            ui.add(DatePickerButton::new(&mut state.config.start).id_salt("start_date"));
            ui.end_row();

            ui.label("To");
            ui.add(DatePickerButton::new(&mut state.config.end).id_salt("end_date"));
            ui.end_row();

            ui.label("Latitude");
            ui.add(
                DragValue::new(&mut state.config.target_lat)
                    .speed(0.01)
                    .range(-90.0..=90.0)
                    .fixed_decimals(4)
                    .suffix("°N"),
            );
            ui.end_row();

            ui.label("Longitude");
            ui.add(
                DragValue::new(&mut state.config.target_lon)
                    .speed(0.01)
                    .range(-180.0..=360.0)
                    .fixed_decimals(4)
                    .suffix("°E"),
            );
            ui.end_row();
        });

    ui.add_space(4.0);
    let can_run = state.dataset.is_some();
    if ui.add_enabled(can_run, egui::Button::new("Apply")).clicked() {
        state.run_analysis();
    }
    ui.separator();

    let Some(analysis) = &state.analysis else {
        ui.label("No series extracted.");
        return;
    };

    let series = &analysis.series;
    ui.strong("Grid cell");
    ui.label(format!(
        "{:.4}°N, {:.4}°E  (index {}, {})",
        series.point.latitude, series.point.longitude, series.point.lat_index, series.point.lon_index
    ));
    ui.label(format!("{} time steps", series.len()));
    for layer in MoistureLayer::ALL {
        let trend = analysis.layer(layer);
        let text = match &trend.fit {
            Ok(fit) => format!("Layer {}: {}", layer.number(), fit.equation()),
            Err(e) => format!("Layer {}: {e}", layer.number()),
        };
        ui.label(text);
        if trend.dropped > 0 {
            ui.small(format!("{} missing samples skipped", trend.dropped));
        }
    }
    ui.separator();

    ui.strong("Series");
    let moisture_units = series.moisture_units.clone();
    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto())
        .columns(Column::remainder(), 3)
        .header(20.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Time");
            });
            header.col(|ui: &mut Ui| {
                ui.strong(format!("T ({})", series.temperature_units));
            });
            header.col(|ui: &mut Ui| {
                ui.strong("SM1").on_hover_text(moisture_units.as_str());
            });
            header.col(|ui: &mut Ui| {
                ui.strong("SM2").on_hover_text(moisture_units.as_str());
            });
        })
        .body(|body| {
            body.rows(18.0, series.len(), |mut row| {
                let i = row.index();
                row.col(|ui: &mut Ui| {
                    ui.label(series.times[i].format("%Y-%m-%d %H:%M").to_string());
                });
                for v in [series.temperature[i], series.moisture_1[i], series.moisture_2[i]] {
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{v:.3}"));
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.analysis.is_some(), egui::Button::new("Export series…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(state.config.dataset_path.display().to_string());
        if let Some(ds) = &state.dataset {
            let [n_time, n_lat, n_lon] = ds.shape();
            ui.label(format!("{n_time} time steps, {n_lat}×{n_lon} grid"));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::DARK_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open gridded dataset")
        .add_filter("Supported files", &["nc", "nc4", "json"])
        .add_filter("NetCDF", &["nc", "nc4"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_dataset(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export series")
        .add_filter("CSV", &["csv"])
        .set_file_name("point_series.csv")
        .save_file();

    if let Some(path) = file {
        // Outcome is logged and shown in the status line.
        let _ = state.export_series(&path);
    }
}
