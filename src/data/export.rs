use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::PointSeries;

/// Write the extracted series as `time,temperature,moisture_1,moisture_2`.
/// Missing samples are written as empty cells.
pub fn write_series<W: Write>(out: W, series: &PointSeries) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["time", "temperature", "moisture_1", "moisture_2"])
        .context("writing CSV header")?;

    let cell = |v: f64| if v.is_finite() { v.to_string() } else { String::new() };

    for (i, t) in series.times.iter().enumerate() {
        writer
            .write_record([
                t.format("%Y-%m-%dT%H:%M:%S").to_string(),
                cell(series.temperature[i]),
                cell(series.moisture_1[i]),
                cell(series.moisture_2[i]),
            ])
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_csv(path: &Path, series: &PointSeries) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_series(file, series)?;
    log::info!("Exported {} rows to {}", series.len(), path.display());
    Ok(())
}
