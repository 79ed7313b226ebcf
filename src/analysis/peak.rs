use crate::analysis::error::AnalysisError;
use crate::analysis::hourly::average_volume_by_hour;
use crate::analysis::types::{HourlyAverages, PeakHour};
use crate::record::{DayType, TrafficRecord};

/// Hour with the highest mean traffic volume.
///
/// Hours are scanned in ascending order and the first one reaching the
/// maximum wins, so ties resolve to the earliest hour.
pub fn peak_hour_by_average(records: &[TrafficRecord]) -> Result<PeakHour, AnalysisError> {
    let by_hour = average_volume_by_hour(records);
    first_maximum(&by_hour).ok_or(AnalysisError::EmptyInput)
}

/// Peak hour among Monday–Friday records only.
pub fn peak_hour_weekday(records: &[TrafficRecord]) -> Result<PeakHour, AnalysisError> {
    peak_hour_for(records, DayType::Weekday)
}

/// Peak hour among Saturday/Sunday records only.
pub fn peak_hour_weekend(records: &[TrafficRecord]) -> Result<PeakHour, AnalysisError> {
    peak_hour_for(records, DayType::Weekend)
}

fn peak_hour_for(records: &[TrafficRecord], day_type: DayType) -> Result<PeakHour, AnalysisError> {
    let filtered: Vec<TrafficRecord> = records
        .iter()
        .filter(|r| r.day_type() == day_type)
        .cloned()
        .collect();

    peak_hour_by_average(&filtered)
}

/// Peak of an already computed curve, skipping non-finite values.
///
/// Meant for the zero-filled curves of
/// [`average_volume_by_hour_weekday_vs_weekend`](crate::analysis::average_volume_by_hour_weekday_vs_weekend),
/// where a curve with no data is all zeros and its peak is hour 0.
pub fn peak_of_curve(curve: &HourlyAverages) -> Option<PeakHour> {
    first_maximum(curve)
}

fn first_maximum(averages: &HourlyAverages) -> Option<PeakHour> {
    let mut peak: Option<PeakHour> = None;

    for (&hour, &avg) in averages {
        if !avg.is_finite() {
            continue;
        }
        match peak {
            Some(p) if avg <= p.average_volume => {}
            _ => {
                peak = Some(PeakHour {
                    hour,
                    average_volume: avg,
                })
            }
        }
    }

    peak
}
