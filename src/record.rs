//! The observation record consumed by the aggregation engine.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::fmt;

/// One hourly traffic measurement with its weather context.
///
/// Built by [`crate::loader`]; the analysis functions only ever read these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRecord {
    /// Holiday name, `"None"` on ordinary days.
    pub holiday: String,
    pub temp_k: f64,
    pub rain_1h_mm: f64,
    pub snow_1h_mm: f64,
    pub clouds_all_pct: u8,
    pub weather_main: String,
    pub weather_description: String,
    pub date_time: NaiveDateTime,
    pub traffic_volume: u32,
}

impl TrafficRecord {
    /// Hour of day (0–23) of the local timestamp.
    pub fn hour(&self) -> u32 {
        self.date_time.hour()
    }

    pub fn day_type(&self) -> DayType {
        DayType::of(self.date_time.weekday())
    }

    pub fn is_weekend(&self) -> bool {
        self.day_type() == DayType::Weekend
    }
}

/// Weekday (Mon–Fri) or weekend (Sat–Sun) partition of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];

    pub fn of(day: Weekday) -> Self {
        match day {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
