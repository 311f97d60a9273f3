/// Data layer: grid model, loading, unit handling, point selection and trend fitting.
///
/// Architecture:
/// ```text
///  .nc / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → GriddedDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  units    │  Kelvin → °C on the temperature variable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  nearest cell + date window → PointSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  trend    │  least-squares line per moisture layer
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod select;
pub mod time;
pub mod trend;
pub mod units;
