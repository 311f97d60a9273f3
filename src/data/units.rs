use super::error::DataError;
use super::model::GriddedDataset;

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

pub const CELSIUS: &str = "°C";

pub fn is_kelvin(units: &str) -> bool {
    units == "K" || units.eq_ignore_ascii_case("kelvin")
}

/// Convert a Kelvin temperature variable to Celsius in place.
///
/// Returns `true` when a conversion happened. Any unit other than Kelvin is
/// left untouched.
pub fn normalize_temperature(dataset: &mut GriddedDataset, name: &str) -> Result<bool, DataError> {
    let var = dataset.variable_mut(name)?;
    if !is_kelvin(&var.units) {
        return Ok(false);
    }
    var.values.mapv_inplace(|k| k - KELVIN_OFFSET);
    var.units = CELSIUS.to_string();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(units: &str, values: Vec<f64>) -> GriddedDataset {
        let t0 = NaiveDate::from_ymd_opt(2010, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let times = (0..values.len() as i64)
            .map(|h| t0 + chrono::Duration::hours(h))
            .collect();
        let mut ds = GriddedDataset::new(times, vec![26.5], vec![88.25]);
        ds.insert_variable("t2m", units, values).unwrap();
        ds
    }

    #[test]
    fn kelvin_is_shifted_sample_by_sample() {
        let input = vec![273.15, 300.0, 250.5, f64::NAN];
        let mut ds = dataset("K", input.clone());

        assert!(normalize_temperature(&mut ds, "t2m").unwrap());

        let var = ds.variable("t2m").unwrap();
        assert_eq!(var.units, CELSIUS);
        for (out, inp) in var.values.iter().zip(&input[..3]) {
            assert!((out - (inp - 273.15)).abs() < 1e-12);
        }
        assert!(var.values[[3, 0, 0]].is_nan());
    }

    #[test]
    fn other_units_pass_through() {
        let mut ds = dataset("degC", vec![21.0, 22.0]);
        assert!(!normalize_temperature(&mut ds, "t2m").unwrap());
        let var = ds.variable("t2m").unwrap();
        assert_eq!(var.units, "degC");
        assert_eq!(var.values[[1, 0, 0]], 22.0);
    }

    #[test]
    fn converting_twice_is_a_no_op() {
        let mut ds = dataset("K", vec![283.15]);
        normalize_temperature(&mut ds, "t2m").unwrap();
        assert!(!normalize_temperature(&mut ds, "t2m").unwrap());
        assert!((ds.variable("t2m").unwrap().values[[0, 0, 0]] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn missing_temperature_is_an_error() {
        let mut ds = dataset("K", vec![283.15]);
        assert_eq!(
            normalize_temperature(&mut ds, "t2").unwrap_err(),
            DataError::MissingVariable("t2".into())
        );
    }
}
