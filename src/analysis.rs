use crate::config::AnalysisConfig;
use crate::data::error::DataError;
use crate::data::model::{GriddedDataset, MoistureLayer, PointSeries};
use crate::data::select::extract_point_series;
use crate::data::trend::LinearFit;

// ---------------------------------------------------------------------------
// One scatter panel's worth of data
// ---------------------------------------------------------------------------

/// Valid (moisture, temperature) pairs for one layer and their trend line.
#[derive(Debug, Clone)]
pub struct LayerTrend {
    pub layer: MoistureLayer,
    /// `(time index, moisture, temperature)`; the time index drives colour.
    pub points: Vec<(usize, f64, f64)>,
    /// Time steps left out because a value was missing.
    pub dropped: usize,
    pub fit: Result<LinearFit, DataError>,
}

impl LayerTrend {
    fn compute(series: &PointSeries, layer: MoistureLayer) -> Self {
        let points = series.valid_pairs(layer);
        let dropped = series.len() - points.len();
        if dropped > 0 {
            log::warn!(
                "layer {}: {dropped} of {} time steps have missing values",
                layer.number(),
                series.len()
            );
        }

        let (x, y): (Vec<f64>, Vec<f64>) = points.iter().map(|&(_, x, y)| (x, y)).unzip();
        let fit = LinearFit::fit(&x, &y);
        match &fit {
            Ok(f) => log::info!("layer {}: {}", layer.number(), f.equation()),
            Err(e) => log::warn!("layer {}: no trend line: {e}", layer.number()),
        }

        Self {
            layer,
            points,
            dropped,
            fit,
        }
    }

    /// Moisture extent of the valid points, for drawing the trend segment.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, &(_, x, _)| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
    }
}

// ---------------------------------------------------------------------------
// Analysis – the whole figure
// ---------------------------------------------------------------------------

/// Everything the figure needs, together with the settings it was run with.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub series: PointSeries,
    pub layers: [LayerTrend; 2],
}

impl Analysis {
    pub fn layer(&self, layer: MoistureLayer) -> &LayerTrend {
        match layer {
            MoistureLayer::One => &self.layers[0],
            MoistureLayer::Two => &self.layers[1],
        }
    }

    /// Figure-wide title.
    pub fn suptitle(&self) -> String {
        let c = &self.config;
        format!(
            "Temperature vs Soil Moisture Relationship at ({}°N, {}°E) ({}-{})",
            c.target_lat,
            c.target_lon,
            c.start.format("%Y"),
            c.end.format("%Y")
        )
    }

    /// Two-line title of one scatter panel.
    pub fn panel_title(&self, layer: MoistureLayer) -> String {
        let c = &self.config;
        format!(
            "Soil Moisture Level {} vs Temperature\n{} [{} to {}] ({}°N, {}°E)",
            layer.number(),
            c.place,
            c.start,
            c.end,
            c.target_lat,
            c.target_lon
        )
    }
}

/// Cut the point series and fit both trend lines.
///
/// Expects temperature to be normalized already.
pub fn run(dataset: &GriddedDataset, config: &AnalysisConfig) -> Result<Analysis, DataError> {
    let series = extract_point_series(dataset, &config.query())?;
    log::info!(
        "Selected cell ({}, {}) at index ({}, {}), {} time steps",
        series.point.latitude,
        series.point.longitude,
        series.point.lat_index,
        series.point.lon_index,
        series.len()
    );

    let layers = MoistureLayer::ALL.map(|layer| LayerTrend::compute(&series, layer));
    Ok(Analysis {
        config: config.clone(),
        series,
        layers,
    })
}
