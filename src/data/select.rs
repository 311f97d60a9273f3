use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{s, Array1};

use super::error::DataError;
use super::model::{GridPoint, GriddedDataset, PointSeries};

// ---------------------------------------------------------------------------
// Query: which point, which dates, which variables
// ---------------------------------------------------------------------------

/// Everything needed to cut a point time series out of a dataset.
#[derive(Debug, Clone, Copy)]
pub struct PointQuery<'a> {
    pub latitude: f64,
    pub longitude: f64,
    /// First calendar day kept (inclusive).
    pub start: NaiveDate,
    /// Last calendar day kept (inclusive, whole day).
    pub end: NaiveDate,
    pub temperature: &'a str,
    pub moisture: [&'a str; 2],
}

/// Resolved indices shared by every extracted variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub point: GridPoint,
    pub time_indices: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Nearest-neighbour and date-range lookup
// ---------------------------------------------------------------------------

/// Index of the coordinate closest to `target`.
///
/// Ties go to the larger coordinate value, so the result does not depend on
/// whether the axis is stored ascending or descending. NaN coordinates are
/// never picked.
pub fn nearest_index(axis: &[f64], target: f64, name: &'static str) -> Result<usize, DataError> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in axis.iter().enumerate() {
        let d = (v - target).abs();
        if d.is_nan() {
            continue;
        }
        best = match best {
            None => Some((i, d)),
            Some((j, bd)) if d < bd || (d == bd && v > axis[j]) => Some((i, d)),
            keep => keep,
        };
    }
    best.map(|(i, _)| i).ok_or(DataError::EmptyAxis(name))
}

/// Indices of every timestamp whose calendar date falls in `[start, end]`.
pub fn date_indices(times: &[NaiveDateTime], start: NaiveDate, end: NaiveDate) -> Vec<usize> {
    times
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            let d = t.date();
            d >= start && d <= end
        })
        .map(|(i, _)| i)
        .collect()
}

/// Resolve the grid cell and time steps for a query.
pub fn select(dataset: &GriddedDataset, query: &PointQuery<'_>) -> Result<Selection, DataError> {
    let lat_index = nearest_index(&dataset.latitude, query.latitude, "latitude")?;
    let lon_index = nearest_index(&dataset.longitude, query.longitude, "longitude")?;

    let time_indices = date_indices(&dataset.time, query.start, query.end);
    if time_indices.is_empty() {
        return Err(DataError::EmptySelection {
            start: query.start,
            end: query.end,
        });
    }

    Ok(Selection {
        point: GridPoint {
            lat_index,
            lon_index,
            latitude: dataset.latitude[lat_index],
            longitude: dataset.longitude[lon_index],
        },
        time_indices,
    })
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

fn column(
    dataset: &GriddedDataset,
    name: &str,
    selection: &Selection,
) -> Result<(Array1<f64>, String), DataError> {
    let var = dataset.variable(name)?;
    let cell = var
        .values
        .slice(s![.., selection.point.lat_index, selection.point.lon_index]);
    let values = selection.time_indices.iter().map(|&t| cell[t]).collect();
    Ok((values, var.units.clone()))
}

/// Cut temperature and both moisture layers at the query point.
///
/// All three series are taken with the same [`Selection`], so they always
/// share length and time index.
pub fn extract_point_series(
    dataset: &GriddedDataset,
    query: &PointQuery<'_>,
) -> Result<PointSeries, DataError> {
    let selection = select(dataset, query)?;

    let (temperature, temperature_units) = column(dataset, query.temperature, &selection)?;
    let (moisture_1, moisture_units) = column(dataset, query.moisture[0], &selection)?;
    let (moisture_2, _) = column(dataset, query.moisture[1], &selection)?;

    let times = selection
        .time_indices
        .iter()
        .map(|&t| dataset.time[t])
        .collect();

    Ok(PointSeries {
        point: selection.point,
        times,
        temperature,
        temperature_units,
        moisture_1,
        moisture_2,
        moisture_units,
    })
}
