//! Result shapes handed to report builders and renderers.

use crate::record::DayType;
use serde::Serialize;
use std::collections::BTreeMap;

/// Hour of day (0–23) to mean traffic volume, iterated in hour order.
pub type HourlyAverages = BTreeMap<u32, f64>;

/// Weekday/Weekend to mean traffic volume.
pub type DayTypeAverages = BTreeMap<DayType, f64>;

/// Weekday/Weekend to a full 24-hour curve.
pub type HourlyCurves = BTreeMap<DayType, HourlyAverages>;

/// Free-form category label to mean traffic volume, iterated alphabetically.
pub type CategoryAverages = BTreeMap<String, f64>;

/// The hour with the highest mean volume within some scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakHour {
    pub hour: u32,
    pub average_volume: f64,
}
