use crate::analysis::error::AnalysisError;
use crate::analysis::types::{DayTypeAverages, HourlyAverages, HourlyCurves};
use crate::analysis::utility::MeanAccumulator;
use crate::record::{DayType, TrafficRecord};
use std::collections::BTreeMap;

const HOURS_PER_DAY: usize = 24;

/// Mean traffic volume per hour of day.
///
/// Only hours that occur in `records` appear in the result; empty hours are
/// omitted rather than reported as zero.
pub fn average_volume_by_hour(records: &[TrafficRecord]) -> HourlyAverages {
    let mut groups: BTreeMap<u32, MeanAccumulator> = BTreeMap::new();

    for r in records {
        groups
            .entry(r.hour())
            .or_default()
            .push(r.traffic_volume as f64);
    }

    groups
        .into_iter()
        .filter_map(|(hour, acc)| acc.mean().map(|avg| (hour, avg)))
        .collect()
}

/// Overall mean traffic volume for weekdays and for weekends.
///
/// Fails with [`AnalysisError::EmptyPartition`] if either day type has no
/// records; the weekday partition is checked first.
pub fn average_weekday_vs_weekend(
    records: &[TrafficRecord],
) -> Result<DayTypeAverages, AnalysisError> {
    let mut weekday = MeanAccumulator::default();
    let mut weekend = MeanAccumulator::default();

    for r in records {
        match r.day_type() {
            DayType::Weekday => weekday.push(r.traffic_volume as f64),
            DayType::Weekend => weekend.push(r.traffic_volume as f64),
        }
    }

    let mut out = DayTypeAverages::new();
    for (day_type, acc) in [(DayType::Weekday, weekday), (DayType::Weekend, weekend)] {
        let avg = acc
            .mean()
            .ok_or(AnalysisError::EmptyPartition { day_type })?;
        out.insert(day_type, avg);
    }
    Ok(out)
}

/// 24-point hourly curves for weekdays and weekends.
///
/// Unlike [`average_volume_by_hour`], every hour 0–23 is present in both
/// curves; an hour with no records in a partition maps to `0.0`.
pub fn average_volume_by_hour_weekday_vs_weekend(records: &[TrafficRecord]) -> HourlyCurves {
    let mut weekday = [MeanAccumulator::default(); HOURS_PER_DAY];
    let mut weekend = [MeanAccumulator::default(); HOURS_PER_DAY];

    for r in records {
        let h = r.hour() as usize;
        match r.day_type() {
            DayType::Weekday => weekday[h].push(r.traffic_volume as f64),
            DayType::Weekend => weekend[h].push(r.traffic_volume as f64),
        }
    }

    let curve = |accs: &[MeanAccumulator; HOURS_PER_DAY]| -> HourlyAverages {
        accs.iter()
            .enumerate()
            .map(|(h, acc)| (h as u32, acc.mean().unwrap_or(0.0)))
            .collect()
    };

    HourlyCurves::from([
        (DayType::Weekday, curve(&weekday)),
        (DayType::Weekend, curve(&weekend)),
    ])
}
