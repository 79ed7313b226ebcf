//! Report assembly.
//!
//! Bundles every aggregate view into one serializable [`TrafficReport`] and
//! writes the figure captions and LaTeX figure blocks a chart renderer would
//! place next to its images.

use crate::analysis::{
    AnalysisError, CategoryAverages, DayTypeAverages, HourlyAverages, HourlyCurves, PeakHour,
    average_volume_by_hour, average_volume_by_hour_weekday_vs_weekend,
    average_volume_by_weather_main, average_weekday_vs_weekend, peak_hour_by_average,
    peak_hour_weekday, peak_hour_weekend, peak_of_curve, top_category,
};
use crate::config::ReportConfig;
use crate::record::{DayType, TrafficRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// One chart the renderer is expected to draw, with its caption text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub number: u32,
    pub title: String,
    pub image_path: String,
    pub caption: String,
    pub label: String,
}

impl Figure {
    /// LaTeX `figure` environment referencing the image.
    pub fn latex_block(&self) -> String {
        format!(
            "\\begin{{figure}}[ht]\n  \\centering\n  \\includegraphics[width=0.95\\linewidth]{{{}}}\n  \\caption{{{}}}\n  \\label{{{}}}\n\\end{{figure}}",
            self.image_path,
            self.caption.replace('%', "\\%"),
            self.label
        )
    }
}

/// Every aggregate view over one dataset.
#[derive(Debug, Serialize)]
pub struct TrafficReport {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub by_hour: HourlyAverages,
    pub peak_overall: PeakHour,
    /// Absent when the dataset has no weekday or no weekend records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_vs_weekend: Option<DayTypeAverages>,
    pub hourly_curves: HourlyCurves,
    pub peak_weekday: Option<PeakHour>,
    pub peak_weekend: Option<PeakHour>,
    pub by_weather: CategoryAverages,
    pub figures: Vec<Figure>,
}

impl TrafficReport {
    /// Computes all views. Only an empty dataset is an error; views that
    /// cannot be computed for a partial dataset are left out.
    pub fn build(records: &[TrafficRecord], config: &ReportConfig) -> Result<Self, AnalysisError> {
        let peak_overall = peak_hour_by_average(records)?;

        let weekday_vs_weekend = match average_weekday_vs_weekend(records) {
            Ok(avg) => Some(avg),
            Err(e) => {
                warn!(error = %e, "Weekday vs weekend averages unavailable");
                None
            }
        };

        let mut report = TrafficReport {
            generated_at: Utc::now(),
            record_count: records.len(),
            by_hour: average_volume_by_hour(records),
            peak_overall,
            weekday_vs_weekend,
            hourly_curves: average_volume_by_hour_weekday_vs_weekend(records),
            peak_weekday: peak_hour_weekday(records).ok(),
            peak_weekend: peak_hour_weekend(records).ok(),
            by_weather: average_volume_by_weather_main(records),
            figures: Vec::new(),
        };
        report.figures = report.describe(config);
        Ok(report)
    }

    /// All figure blocks, separated by blank lines.
    pub fn latex(&self) -> String {
        self.figures
            .iter()
            .map(Figure::latex_block)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn describe(&self, config: &ReportConfig) -> Vec<Figure> {
        let mut figures = FigureList::new(config);

        let peak = self.peak_overall;
        figures.push(
            "Average Traffic Volume by Hour of Day",
            "traffic-volume.jpg",
            "traffic-volume-hour",
            "Average hourly traffic volume.",
            format!(
                "Peak demand occurs at {} (avg {}).",
                format_hour(peak.hour),
                format_count(peak.average_volume)
            ),
        );

        if let Some(avg) = &self.weekday_vs_weekend {
            figures.push(
                "Average Traffic Volume: Weekday vs Weekend",
                "weekday-vs-weekend.jpg",
                "weekday-vs-weekend",
                "Average traffic volume by day type.",
                format!(
                    "Weekday mean is {} vs weekend mean {}.",
                    format_count(avg[&DayType::Weekday]),
                    format_count(avg[&DayType::Weekend])
                ),
            );
        }

        let curve_peak = |day_type: DayType| self.hourly_curves.get(&day_type).and_then(peak_of_curve);
        if let (Some(wd), Some(we)) = (curve_peak(DayType::Weekday), curve_peak(DayType::Weekend)) {
            figures.push(
                "Hourly Traffic Volume Curves: Weekday vs Weekend",
                "hourly-curves.jpg",
                "hourly-curves",
                "Hourly traffic volume curves for weekday vs weekend.",
                format!(
                    "The weekday peak occurs at {} (~{}), while the weekend peak occurs at {} (~{}).",
                    format_hour(wd.hour),
                    format_count(wd.average_volume),
                    format_hour(we.hour),
                    format_count(we.average_volume)
                ),
            );
        }

        if let Some((weather, avg)) = top_category(&self.by_weather) {
            figures.push(
                "Average Traffic Volume by Weather Condition",
                "weather-impact.jpg",
                "weather-impact",
                "Average traffic volume by weather condition.",
                format!(
                    "Highest mean volume occurs under {} (~{}).",
                    weather,
                    format_count(avg)
                ),
            );
        }

        figures.items
    }
}

struct FigureList<'a> {
    config: &'a ReportConfig,
    items: Vec<Figure>,
}

impl<'a> FigureList<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
        }
    }

    fn push(&mut self, title: &str, file_name: &str, label: &str, lead: &str, body: String) {
        let number = self.items.len() as u32 + 1;
        self.items.push(Figure {
            number,
            title: title.to_string(),
            image_path: self.config.image_path(file_name),
            caption: format!("Figure {}. {} {}", number, lead, body),
            label: format!("{}{}", self.config.label_prefix, label),
        });
    }
}

/// A flat one-line digest of a report, appended to the run history CSV.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub record_count: usize,
    pub peak_hour: u32,
    pub peak_average: f64,
    pub weekday_peak_hour: Option<u32>,
    pub weekday_peak_average: Option<f64>,
    pub weekend_peak_hour: Option<u32>,
    pub weekend_peak_average: Option<f64>,
    pub weekday_average: Option<f64>,
    pub weekend_average: Option<f64>,
}

impl RunSummary {
    pub fn from_report(source: &str, report: &TrafficReport) -> Self {
        let day_avg = |day_type: DayType| {
            report
                .weekday_vs_weekend
                .as_ref()
                .and_then(|avg| avg.get(&day_type).copied())
        };

        RunSummary {
            generated_at: report.generated_at,
            source: source.to_string(),
            record_count: report.record_count,
            peak_hour: report.peak_overall.hour,
            peak_average: report.peak_overall.average_volume,
            weekday_peak_hour: report.peak_weekday.map(|p| p.hour),
            weekday_peak_average: report.peak_weekday.map(|p| p.average_volume),
            weekend_peak_hour: report.peak_weekend.map(|p| p.hour),
            weekend_peak_average: report.peak_weekend.map(|p| p.average_volume),
            weekday_average: day_avg(DayType::Weekday),
            weekend_average: day_avg(DayType::Weekend),
        }
    }
}

/// `7` -> `"07:00"`.
pub fn format_hour(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// Rounds to an integer and groups thousands: `6123.6` -> `"6,124"`.
pub fn format_count(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
