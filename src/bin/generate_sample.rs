//! Writes a synthetic ERA5-Land style `temp_soilmoist.nc` for trying the viewer.

use std::f64::consts::PI;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Seasonal phase in radians, peaking in early July.
fn season(day_of_year: u32) -> f64 {
    2.0 * PI * (day_of_year as f64 - 100.0) / 365.25
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    // Daily steps 2009-12-01 .. 2013-01-31, 0.1° grid around Rajshahi.
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("epoch")?;
    let first = NaiveDate::from_ymd_opt(2009, 12, 1).context("first day")?;
    let last = NaiveDate::from_ymd_opt(2013, 1, 31).context("last day")?;
    let days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d <= last).collect();

    let latitude: Vec<f64> = (0..7).map(|i| 26.8 - 0.1 * i as f64).collect();
    let longitude: Vec<f64> = (0..8).map(|i| 88.0 + 0.1 * i as f64).collect();

    let valid_time: Vec<i64> = days
        .iter()
        .filter_map(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| (t - epoch).num_seconds())
        .collect();

    let n_cells = latitude.len() * longitude.len();
    let mut t2m = Vec::with_capacity(days.len() * n_cells);
    let mut swvl1 = Vec::with_capacity(days.len() * n_cells);
    let mut swvl2 = Vec::with_capacity(days.len() * n_cells);

    for day in &days {
        let phase = season(day.ordinal());
        for (i, _) in latitude.iter().enumerate() {
            for (j, _) in longitude.iter().enumerate() {
                let cell_bias = 0.15 * i as f64 - 0.1 * j as f64;
                // Monsoon wetting lags the temperature peak by about a month.
                let wet = 0.27 + 0.12 * (phase - 0.5).sin() + rng.gauss(0.0, 0.015);
                let deep = 0.30 + 0.08 * (phase - 0.9).sin() + rng.gauss(0.0, 0.008);
                let temp = 298.2 + 6.5 * phase.sin() - 8.0 * (wet - 0.27) + cell_bias
                    + rng.gauss(0.0, 1.2);
                t2m.push(temp as f32);
                swvl1.push(wet.clamp(0.02, 0.55) as f32);
                swvl2.push(deep.clamp(0.02, 0.55) as f32);
            }
        }
    }

    let output_path = "temp_soilmoist.nc";
    let mut file = netcdf::create(output_path).context("creating NetCDF file")?;
    file.add_attribute("Conventions", "CF-1.7")?;
    file.add_attribute("institution", "synthetic sample")?;

    file.add_dimension("valid_time", valid_time.len())?;
    file.add_dimension("latitude", latitude.len())?;
    file.add_dimension("longitude", longitude.len())?;

    {
        let mut var = file.add_variable::<i64>("valid_time", &["valid_time"])?;
        var.put_attribute("units", "seconds since 1970-01-01")?;
        var.put_attribute("calendar", "proleptic_gregorian")?;
        var.put_values(&valid_time, ..)?;
    }
    for (name, units, values) in [
        ("latitude", "degrees_north", &latitude),
        ("longitude", "degrees_east", &longitude),
    ] {
        let mut var = file.add_variable::<f64>(name, &[name])?;
        var.put_attribute("units", units)?;
        var.put_values(values, ..)?;
    }

    let dims = ["valid_time", "latitude", "longitude"];
    for (name, long_name, units, values) in [
        ("t2m", "2 metre temperature", "K", &t2m),
        ("swvl1", "Volumetric soil water layer 1", "m**3 m**-3", &swvl1),
        ("swvl2", "Volumetric soil water layer 2", "m**3 m**-3", &swvl2),
    ] {
        let mut var = file.add_variable::<f32>(name, &dims)?;
        var.put_attribute("long_name", long_name)?;
        var.put_attribute("units", units)?;
        var.put_values(values, ..)?;
    }

    println!(
        "Wrote {} days on a {}×{} grid to {output_path}",
        days.len(),
        latitude.len(),
        longitude.len()
    );
    Ok(())
}
