use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while validating, slicing or fitting a gridded dataset.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("variable '{0}' not found in dataset")]
    MissingVariable(String),

    #[error("coordinate '{0}' not found in dataset")]
    MissingCoordinate(String),

    #[error("coordinate '{0}' is empty")]
    EmptyAxis(&'static str),

    #[error("variable '{name}' has shape {found:?}, expected {expected:?}")]
    BadShape {
        name: String,
        found: Vec<usize>,
        expected: [usize; 3],
    },

    #[error("no timestamps between {start} and {end}")]
    EmptySelection { start: NaiveDate, end: NaiveDate },

    #[error("unsupported time units '{0}'")]
    UnsupportedTimeUnits(String),

    #[error("time offset {0} is outside the representable date range")]
    TimeOutOfRange(f64),

    #[error("need at least 2 valid samples for a trend line, got {0}")]
    TooFewSamples(usize),

    #[error("soil moisture is constant over the selection; trend is undefined")]
    ZeroVariance,
}
