use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use ndarray::{Array1, Array3};

use super::error::DataError;

// ---------------------------------------------------------------------------
// GridVariable – one physical field on the (time, lat, lon) grid
// ---------------------------------------------------------------------------

/// A single gridded variable with its physical units.
#[derive(Debug, Clone)]
pub struct GridVariable {
    /// Units string as found in the source file (e.g. `"K"`, `"m**3 m**-3"`).
    pub units: String,
    /// Values indexed `[time, latitude, longitude]`. Missing samples are NaN.
    pub values: Array3<f64>,
}

// ---------------------------------------------------------------------------
// GriddedDataset – the complete loaded file
// ---------------------------------------------------------------------------

/// Coordinate axes plus every variable read from the dataset.
#[derive(Debug, Clone)]
pub struct GriddedDataset {
    pub time: Vec<NaiveDateTime>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    pub variables: BTreeMap<String, GridVariable>,
}

impl GriddedDataset {
    /// Create an empty dataset over the given axes.
    pub fn new(time: Vec<NaiveDateTime>, latitude: Vec<f64>, longitude: Vec<f64>) -> Self {
        Self {
            time,
            latitude,
            longitude,
            variables: BTreeMap::new(),
        }
    }

    /// Expected `(time, latitude, longitude)` shape of every variable.
    pub fn shape(&self) -> [usize; 3] {
        [self.time.len(), self.latitude.len(), self.longitude.len()]
    }

    /// Add a variable from flat, time-major values.
    pub fn insert_variable(
        &mut self,
        name: &str,
        units: &str,
        values: Vec<f64>,
    ) -> Result<(), DataError> {
        let shape = self.shape();
        let found = values.len();
        let values = Array3::from_shape_vec(shape, values).map_err(|_| DataError::BadShape {
            name: name.to_string(),
            found: vec![found],
            expected: shape,
        })?;
        self.variables.insert(
            name.to_string(),
            GridVariable {
                units: units.to_string(),
                values,
            },
        );
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Result<&GridVariable, DataError> {
        self.variables
            .get(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))
    }

    pub fn variable_mut(&mut self, name: &str) -> Result<&mut GridVariable, DataError> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))
    }

    /// Sorted variable names, for the status line.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// PointSeries – the time series at the selected grid cell
// ---------------------------------------------------------------------------

/// The grid cell picked by nearest-neighbour selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub lat_index: usize,
    pub lon_index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Which soil-moisture layer a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoistureLayer {
    One,
    Two,
}

impl MoistureLayer {
    pub const ALL: [MoistureLayer; 2] = [MoistureLayer::One, MoistureLayer::Two];

    pub fn number(self) -> u8 {
        match self {
            MoistureLayer::One => 1,
            MoistureLayer::Two => 2,
        }
    }
}

/// Temperature and both moisture layers at one grid cell, on one time index.
#[derive(Debug, Clone)]
pub struct PointSeries {
    pub point: GridPoint,
    pub times: Vec<NaiveDateTime>,
    pub temperature: Array1<f64>,
    pub temperature_units: String,
    pub moisture_1: Array1<f64>,
    pub moisture_2: Array1<f64>,
    pub moisture_units: String,
}

impl PointSeries {
    /// Number of time steps.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn moisture(&self, layer: MoistureLayer) -> &Array1<f64> {
        match layer {
            MoistureLayer::One => &self.moisture_1,
            MoistureLayer::Two => &self.moisture_2,
        }
    }

    /// `(time index, moisture, temperature)` for every step where both values
    /// are finite.
    pub fn valid_pairs(&self, layer: MoistureLayer) -> Vec<(usize, f64, f64)> {
        self.moisture(layer)
            .iter()
            .zip(self.temperature.iter())
            .enumerate()
            .filter(|(_, (x, y))| x.is_finite() && y.is_finite())
            .map(|(i, (&x, &y))| (i, x, y))
            .collect()
    }
}
