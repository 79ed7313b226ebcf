//! Traffic volume aggregation.
//!
//! Pure functions that turn a slice of [`TrafficRecord`](crate::record::TrafficRecord)s
//! into hourly, day-type and weather averages and pick peak hours from them.
//! Nothing in here performs I/O or logs; failures are returned as [`AnalysisError`].

pub mod error;
pub mod hourly;
pub mod peak;
pub mod types;
pub mod utility;
pub mod weather;

pub use error::AnalysisError;
pub use hourly::{
    average_volume_by_hour, average_volume_by_hour_weekday_vs_weekend,
    average_weekday_vs_weekend,
};
pub use peak::{peak_hour_by_average, peak_hour_weekday, peak_hour_weekend, peak_of_curve};
pub use types::{CategoryAverages, DayTypeAverages, HourlyAverages, HourlyCurves, PeakHour};
pub use weather::{average_volume_by_weather_main, top_category};
