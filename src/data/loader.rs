use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use super::error::DataError;
use super::model::GriddedDataset;
use super::time::parse_datetime;

/// Accepted names for each coordinate axis, tried in order.
pub const TIME_NAMES: [&str; 2] = ["valid_time", "time"];
pub const LAT_NAMES: [&str; 2] = ["latitude", "lat"];
pub const LON_NAMES: [&str; 2] = ["longitude", "lon"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the coordinate axes and the requested variables.  Dispatch by extension.
///
/// Supported formats:
/// * `.nc` / `.nc4` – NetCDF as downloaded from the Copernicus CDS (ERA5-Land)
/// * `.json`        – `{ "time": [...], "latitude": [...], "longitude": [...], "variables": {...} }`
pub fn load_file(path: &Path, variables: &[&str]) -> Result<GriddedDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "nc" | "nc4" | "netcdf" => load_netcdf(path, variables)?,
        "json" => load_json(path, variables)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {}: {} time steps, {}×{} grid, variables {:?}",
        path.display(),
        dataset.time.len(),
        dataset.latitude.len(),
        dataset.longitude.len(),
        dataset.variable_names()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonGrid {
    time: Vec<String>,
    latitude: Vec<f64>,
    longitude: Vec<f64>,
    variables: BTreeMap<String, JsonVariable>,
}

#[derive(Debug, Deserialize)]
struct JsonVariable {
    #[serde(default)]
    units: String,
    /// Flat, time-major values; `null` marks a missing sample.
    values: Vec<Option<f64>>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "time": ["2010-01-01T00:00:00", ...],
///   "latitude": [26.75, 26.5],
///   "longitude": [88.25, 88.5],
///   "variables": {
///     "t2m":   { "units": "K",          "values": [290.1, 290.4, ...] },
///     "swvl1": { "units": "m**3 m**-3", "values": [0.31, null, ...] }
///   }
/// }
/// ```
fn load_json(path: &Path, variables: &[&str]) -> Result<GriddedDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text, variables)
}

pub fn parse_json(text: &str, variables: &[&str]) -> Result<GriddedDataset> {
    let mut grid: JsonGrid = serde_json::from_str(text).context("parsing JSON grid")?;

    let time = grid
        .time
        .iter()
        .enumerate()
        .map(|(i, t)| parse_datetime(t).with_context(|| format!("time[{i}]: '{t}' is not a timestamp")))
        .collect::<Result<Vec<_>>>()?;

    let mut dataset = GriddedDataset::new(time, grid.latitude, grid.longitude);
    for &name in variables {
        let var = grid
            .variables
            .remove(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))?;
        let values = var
            .values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        dataset.insert_variable(name, &var.units, values)?;
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// NetCDF loader
// ---------------------------------------------------------------------------

#[cfg(not(feature = "netcdf"))]
fn load_netcdf(_path: &Path, _variables: &[&str]) -> Result<GriddedDataset> {
    bail!("NetCDF support not compiled in (enable the `netcdf` feature)")
}

/// Load an ERA5 NetCDF file.
///
/// Expected layout:
/// - a time coordinate `valid_time` (current CDS) or `time` (legacy) with CF units
/// - `latitude` / `longitude` coordinate variables
/// - each requested variable dimensioned `(time, latitude, longitude)`
///
/// Packed variables (`scale_factor` / `add_offset`) are unpacked and
/// `_FillValue` / `missing_value` samples become NaN.
#[cfg(feature = "netcdf")]
fn load_netcdf(path: &Path, variables: &[&str]) -> Result<GriddedDataset> {
    use super::time::decode_times;

    let file = netcdf::open(path).with_context(|| format!("opening NetCDF file {}", path.display()))?;

    let (time_name, time_var) = find_variable(&file, &TIME_NAMES)?;
    let (lat_name, lat_var) = find_variable(&file, &LAT_NAMES)?;
    let (lon_name, lon_var) = find_variable(&file, &LON_NAMES)?;

    let time_units = string_attribute(&time_var, "units")
        .with_context(|| format!("'{time_name}' has no units attribute"))?;
    let offsets = time_var
        .get_values::<f64, _>(..)
        .with_context(|| format!("reading '{time_name}'"))?;
    let time = decode_times(&offsets, &time_units)?;

    let latitude = lat_var
        .get_values::<f64, _>(..)
        .with_context(|| format!("reading '{lat_name}'"))?;
    let longitude = lon_var
        .get_values::<f64, _>(..)
        .with_context(|| format!("reading '{lon_name}'"))?;

    let mut dataset = GriddedDataset::new(time, latitude, longitude);
    let expected_dims = [time_name, lat_name, lon_name];

    for &name in variables {
        let var = file
            .variable(name)
            .ok_or_else(|| DataError::MissingVariable(name.to_string()))?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        if dims != expected_dims {
            bail!("'{name}' is dimensioned {dims:?}, expected {expected_dims:?}");
        }

        let raw = var
            .get_values::<f64, _>(..)
            .with_context(|| format!("reading '{name}'"))?;
        let values = unpack(
            raw,
            numeric_attribute(&var, "scale_factor"),
            numeric_attribute(&var, "add_offset"),
            &[
                numeric_attribute(&var, "_FillValue"),
                numeric_attribute(&var, "missing_value"),
            ],
        );
        let units = string_attribute(&var, "units").unwrap_or_default();
        dataset.insert_variable(name, &units, values)?;
    }

    Ok(dataset)
}

// -- NetCDF helpers --

#[cfg(feature = "netcdf")]
fn find_variable<'f>(
    file: &'f netcdf::File,
    names: &[&'static str],
) -> Result<(&'static str, netcdf::Variable<'f>)> {
    names
        .iter()
        .find_map(|&n| file.variable(n).map(|v| (n, v)))
        .ok_or_else(|| DataError::MissingCoordinate(names.join(" / ")).into())
}

#[cfg(feature = "netcdf")]
fn string_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(mut v) if !v.is_empty() => Some(v.swap_remove(0)),
        _ => None,
    }
}

#[cfg(feature = "netcdf")]
fn numeric_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    use netcdf::AttributeValue as A;

    let value = match var.attribute(name)?.value().ok()? {
        A::Uchar(v) => v as f64,
        A::Schar(v) => v as f64,
        A::Ushort(v) => v as f64,
        A::Short(v) => v as f64,
        A::Uint(v) => v as f64,
        A::Int(v) => v as f64,
        A::Ulonglong(v) => v as f64,
        A::Longlong(v) => v as f64,
        A::Float(v) => v as f64,
        A::Double(v) => v,
        _ => return None,
    };
    Some(value)
}

/// Apply CF packing and mask fill values.  Fill values are compared against
/// the raw (packed) numbers.
pub fn unpack(
    raw: Vec<f64>,
    scale_factor: Option<f64>,
    add_offset: Option<f64>,
    fill_values: &[Option<f64>],
) -> Vec<f64> {
    let scale = scale_factor.unwrap_or(1.0);
    let offset = add_offset.unwrap_or(0.0);
    let fills: Vec<f64> = fill_values.iter().flatten().copied().collect();

    raw.into_iter()
        .map(|v| {
            if fills.iter().any(|&f| v == f) {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect()
}


#[cfg(all(test, feature = "netcdf"))]
mod netcdf_tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    const LAT: [f32; 2] = [26.75, 26.5];
    const LON: [f32; 2] = [88.25, 88.5];
    const SOIL: [&str; 2] = ["swvl1", "swvl2"];

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap()
    }

    /// Lat/lon axes plus plain f32 soil-moisture layers dimensioned `(time_name, latitude, longitude)`.
    fn write_grid(file: &mut netcdf::FileMut, time_name: &str, n_time: usize) -> Result<()> {
        file.add_dimension(time_name, n_time)?;
        file.add_dimension("latitude", LAT.len())?;
        file.add_dimension("longitude", LON.len())?;
        for (name, values) in [("latitude", &LAT), ("longitude", &LON)] {
            let mut var = file.add_variable::<f32>(name, &[name])?;
            var.put_values(values, ..)?;
        }
        let n = n_time * LAT.len() * LON.len();
        for (k, name) in SOIL.iter().enumerate() {
            let values: Vec<f32> = (0..n).map(|i| 0.25 * (k + 1) as f32 + 0.001 * i as f32).collect();
            let mut var = file.add_variable::<f32>(name, &[time_name, "latitude", "longitude"])?;
            var.put_attribute("units", "m**3 m**-3")?;
            var.put_values(&values, ..)?;
        }
        Ok(())
    }

    /// Legacy CDS layout: `time` in hours since 1900, packed i16 `t2m`.
    fn write_legacy(path: &Path, t2m_dims: [&str; 3]) -> Result<()> {
        let mut file = netcdf::create(path)?;
        write_grid(&mut file, "time", 2)?;
        {
            let mut var = file.add_variable::<i32>("time", &["time"])?;
            var.put_attribute("units", "hours since 1900-01-01 00:00:00.0")?;
            var.put_values(&[964_248i32, 964_254], ..)?;
        }
        let mut var = file.add_variable::<i16>("t2m", &t2m_dims)?;
        var.put_attribute("scale_factor", 0.01f64)?;
        var.put_attribute("add_offset", 290.0f64)?;
        var.put_attribute("_FillValue", -32767i16)?;
        var.put_attribute("units", "K")?;
        var.put_values(&[0i16, 100, -32767, -50, 1, 2, 3, 4], ..)?;
        Ok(())
    }

    #[test]
    fn legacy_file_is_unpacked_and_time_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.nc");
        write_legacy(&path, ["time", "latitude", "longitude"]).unwrap();

        let ds = load_file(&path, &["t2m", "swvl1", "swvl2"]).unwrap();
        assert_eq!(ds.time, vec![dt(2010, 1, 1, 0), dt(2010, 1, 1, 6)]);
        assert_eq!(ds.latitude, vec![26.75, 26.5]);
        assert_eq!(ds.longitude, vec![88.25, 88.5]);

        let t2m = ds.variable("t2m").unwrap();
        assert_eq!(t2m.units, "K");
        assert!((t2m.values[[0, 0, 0]] - 290.0).abs() < 1e-9);
        assert!((t2m.values[[0, 0, 1]] - 291.0).abs() < 1e-9);
        assert!(t2m.values[[0, 1, 0]].is_nan());
        assert!((t2m.values[[0, 1, 1]] - 289.5).abs() < 1e-9);

        let swvl2 = ds.variable("swvl2").unwrap();
        assert_eq!(swvl2.units, "m**3 m**-3");
        assert!((swvl2.values[[1, 0, 0]] - 0.504).abs() < 1e-6);
    }

    #[test]
    fn current_layout_uses_valid_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            write_grid(&mut file, "valid_time", 1).unwrap();
            let mut var = file.add_variable::<i64>("valid_time", &["valid_time"]).unwrap();
            var.put_attribute("units", "seconds since 1970-01-01").unwrap();
            var.put_values(&[1_356_976_800i64], ..).unwrap();
        }

        let ds = load_file(&path, &SOIL).unwrap();
        assert_eq!(ds.time, vec![dt(2012, 12, 31, 18)]);
        assert_eq!(ds.shape(), [1, 2, 2]);
    }

    #[test]
    fn transposed_variable_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transposed.nc");
        write_legacy(&path, ["time", "longitude", "latitude"]).unwrap();

        let err = load_file(&path, &["t2m"]).unwrap_err();
        assert!(format!("{err:#}").contains("dimensioned"), "{err:#}");
    }

    #[test]
    fn missing_time_axis_is_a_coordinate_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_time.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            write_grid(&mut file, "step", 1).unwrap();
        }

        let err = load_file(&path, &SOIL).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingCoordinate("valid_time / time".into()))
        );
    }

    #[test]
    fn missing_variable_in_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.nc");
        write_legacy(&path, ["time", "latitude", "longitude"]).unwrap();

        let err = load_file(&path, &["t2m", "swvl3"]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingVariable("swvl3".into()))
        );
    }
}
