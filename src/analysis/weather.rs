use crate::analysis::types::CategoryAverages;
use crate::analysis::utility::MeanAccumulator;
use crate::record::TrafficRecord;
use std::collections::BTreeMap;

/// Mean traffic volume per `weather_main` category.
///
/// Records with a blank category are skipped. Categories are trimmed before
/// grouping and come back in alphabetical order.
pub fn average_volume_by_weather_main(records: &[TrafficRecord]) -> CategoryAverages {
    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();

    for r in records {
        let category = r.weather_main.trim();
        if category.is_empty() {
            continue;
        }
        groups
            .entry(category)
            .or_default()
            .push(r.traffic_volume as f64);
    }

    groups
        .into_iter()
        .filter_map(|(category, acc)| acc.mean().map(|avg| (category.to_string(), avg)))
        .collect()
}

/// Category with the highest finite mean; the alphabetically first wins a tie.
pub fn top_category(averages: &CategoryAverages) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;

    for (category, &avg) in averages {
        if !avg.is_finite() {
            continue;
        }
        if best.is_none_or(|(_, b)| avg > b) {
            best = Some((category.as_str(), avg));
        }
    }

    best
}
