use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::select::PointQuery;

/// Optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "soilmoist.json";

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Which file to read, which point and period to cut, and how to label it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub dataset_path: PathBuf,
    /// Place name shown in the panel titles.
    pub place: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub target_lat: f64,
    pub target_lon: f64,
    pub temperature_var: String,
    pub moisture_vars: [String; 2],
}

const DEFAULT_START: NaiveDate = match NaiveDate::from_ymd_opt(2010, 1, 1) {
    Some(d) => d,
    None => panic!("invalid default start date"),
};
const DEFAULT_END: NaiveDate = match NaiveDate::from_ymd_opt(2012, 12, 31) {
    Some(d) => d,
    None => panic!("invalid default end date"),
};

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("temp_soilmoist.nc"),
            place: "Rajshahi".to_string(),
            start: DEFAULT_START,
            end: DEFAULT_END,
            target_lat: 26.4940,
            target_lon: 88.3568,
            temperature_var: "t2m".to_string(),
            moisture_vars: ["swvl1".to_string(), "swvl2".to_string()],
        }
    }
}

impl AnalysisConfig {
    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Variables the loader must read.
    pub fn variables(&self) -> [&str; 3] {
        [
            self.temperature_var.as_str(),
            self.moisture_vars[0].as_str(),
            self.moisture_vars[1].as_str(),
        ]
    }

    pub fn query(&self) -> PointQuery<'_> {
        PointQuery {
            latitude: self.target_lat,
            longitude: self.target_lon,
            start: self.start,
            end: self.end,
            temperature: self.temperature_var.as_str(),
            moisture: [self.moisture_vars[0].as_str(), self.moisture_vars[1].as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_rajshahi_study() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.dataset_path, PathBuf::from("temp_soilmoist.nc"));
        assert_eq!(cfg.start.to_string(), "2010-01-01");
        assert_eq!(cfg.end.to_string(), "2012-12-31");
        assert_eq!(cfg.variables(), ["t2m", "swvl1", "swvl2"]);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = AnalysisConfig::from_json(
            r#"{ "place": "Dhaka", "target_lat": 23.81, "target_lon": 90.41, "start": "2015-03-01" }"#,
        )
        .unwrap();
        assert_eq!(cfg.place, "Dhaka");
        assert_eq!(cfg.start, NaiveDate::from_ymd_opt(2015, 3, 1).unwrap());
        assert_eq!(cfg.end, AnalysisConfig::default().end);
        let q = cfg.query();
        assert_eq!((q.latitude, q.longitude), (23.81, 90.41));
        assert_eq!(q.moisture, ["swvl1", "swvl2"]);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(AnalysisConfig::from_json(r#"{ "start": "not a date" }"#).is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AnalysisConfig::load_or_default(Path::new("/nonexistent/soilmoist.json")).unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }
}
