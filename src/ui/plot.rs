use eframe::egui::{self, Align2, Color32, RichText, Sense, Ui};
use egui_plot::{Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::analysis::Analysis;
use crate::color::{ColorMap, with_alpha};
use crate::data::model::MoistureLayer;
use crate::state::AppState;

/// Scatter colours are quantized to this many time bins.
const COLOR_BINS: usize = 256;
const POINT_ALPHA: f32 = 0.7;
const COLORBAR_HEIGHT: f32 = 48.0;

fn colormap(layer: MoistureLayer) -> ColorMap {
    match layer {
        MoistureLayer::One => ColorMap::Viridis,
        MoistureLayer::Two => ColorMap::Plasma,
    }
}

// ---------------------------------------------------------------------------
// Figure (central panel)
// ---------------------------------------------------------------------------

/// Render the two-panel figure in the central panel.
pub fn figure(ui: &mut Ui, state: &AppState) {
    let analysis = match &state.analysis {
        Some(a) => a,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to view the figure  (File → Open…)");
            });
            return;
        }
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(analysis.suptitle()).size(18.0).strong());
    });
    ui.add_space(6.0);

    ui.columns(2, |cols: &mut [Ui]| {
        for (ui, layer) in cols.iter_mut().zip(MoistureLayer::ALL) {
            scatter_panel(ui, analysis, layer);
        }
    });
}

// ---------------------------------------------------------------------------
// One scatter panel
// ---------------------------------------------------------------------------

/// Group time indices into at most `bins` contiguous runs, each drawn in one
/// colour. Returns `(bin colour position in 0..1, member indices)`.
fn time_bins(points: &[(usize, f64, f64)], n_times: usize, bins: usize) -> Vec<(f32, Vec<[f64; 2]>)> {
    let bins = bins.clamp(1, n_times.max(1));
    let mut out: Vec<(f32, Vec<[f64; 2]>)> = (0..bins)
        .map(|b| {
            let t = if bins > 1 { b as f32 / (bins - 1) as f32 } else { 0.0 };
            (t, Vec::new())
        })
        .collect();

    for &(ti, x, y) in points {
        let b = (ti * bins / n_times.max(1)).min(bins - 1);
        out[b].1.push([x, y]);
    }
    out.retain(|(_, pts)| !pts.is_empty());
    out
}

fn scatter_panel(ui: &mut Ui, analysis: &Analysis, layer: MoistureLayer) {
    let trend = analysis.layer(layer);
    let cmap = colormap(layer);
    let series = &analysis.series;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(analysis.panel_title(layer)).size(14.0));
    });

    let plot_height = (ui.available_height() - COLORBAR_HEIGHT).max(120.0);

    Plot::new(("scatter", layer.number()))
        .height(plot_height)
        .x_axis_label("Soil Moisture (m³/m³)")
        .y_axis_label(format!("2m Temperature ({})", series.temperature_units))
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (t, pts) in time_bins(&trend.points, series.len(), COLOR_BINS) {
                let color = with_alpha(cmap.sample(t), POINT_ALPHA);
                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.0)
                        .color(color),
                );
            }

            let Ok(fit) = &trend.fit else {
                return;
            };
            if let Some((lo, hi)) = trend.x_range() {
                let line: PlotPoints = vec![[lo, fit.eval(lo)], [hi, fit.eval(hi)]].into();
                plot_ui.line(
                    Line::new(line)
                        .color(Color32::RED)
                        .width(1.5)
                        .style(LineStyle::dashed_loose())
                        .name("trend"),
                );
            }

            // Pin the equation to the top-left corner of the visible area.
            let bounds = plot_ui.plot_bounds();
            let [x0, _] = bounds.min();
            let [_, y1] = bounds.max();
            let pos = PlotPoint::new(x0 + 0.05 * bounds.width(), y1 - 0.05 * bounds.height());
            plot_ui.text(
                Text::new(
                    pos,
                    RichText::new(fit.equation())
                        .color(Color32::BLACK)
                        .background_color(Color32::from_white_alpha(204)),
                )
                .anchor(Align2::LEFT_TOP),
            );
        });

    if let Err(e) = &trend.fit {
        ui.label(RichText::new(format!("No trend line: {e}")).color(Color32::RED));
    }

    let first = series.times.first().map(|t| t.date().to_string()).unwrap_or_default();
    let last = series.times.last().map(|t| t.date().to_string()).unwrap_or_default();
    colorbar(ui, cmap, &first, &last);
}

// ---------------------------------------------------------------------------
// Colour bar
// ---------------------------------------------------------------------------

/// Horizontal "Time Progression" bar under a panel.
fn colorbar(ui: &mut Ui, cmap: ColorMap, first: &str, last: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.small(first);
        let width = (ui.available_width() - 80.0).max(40.0);
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 12.0), Sense::hover());

        let steps = 64;
        let dx = rect.width() / steps as f32;
        for i in 0..steps {
            let x0 = rect.left() + i as f32 * dx;
            let seg = egui::Rect::from_min_max(
                egui::pos2(x0, rect.top()),
                egui::pos2(x0 + dx + 0.5, rect.bottom()),
            );
            ui.painter()
                .rect_filled(seg, 0.0, cmap.for_index(i, steps));
        }
        ui.small(last);
    });
    ui.vertical_centered(|ui: &mut Ui| {
        ui.small("Time Progression");
    });
}
