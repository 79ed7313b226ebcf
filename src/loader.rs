//! CSV ingestion of traffic observations.
//!
//! Reads the Metro Interstate style CSV (header row, columns addressed by
//! name) into [`TrafficRecord`]s, applying the field defaults the analysis
//! relies on: blank holiday becomes `"None"`, blank numbers become `0`, volume
//! and cloud cover are rounded to integers. Non-finite numbers, negative or
//! oversized volumes and cloud cover outside 0–100 are rejected. Gzip input is detected by its
//! magic bytes and decompressed on the fly.

use crate::record::TrafficRecord;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Accepted `date_time` layouts, tried in order.
const DATE_TIME_FORMATS: &[&str] = &["%d-%m-%Y %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("CSV not found at: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: unparseable date_time {value:?}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: column {column} is not a number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// A CSV row before defaulting. Every column is optional so that missing
/// columns and blank cells are handled the same way.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRow {
    holiday: Option<String>,
    temp: Option<String>,
    rain_1h: Option<String>,
    snow_1h: Option<String>,
    clouds_all: Option<String>,
    weather_main: Option<String>,
    weather_description: Option<String>,
    date_time: Option<String>,
    traffic_volume: Option<String>,
}

impl RawRow {
    fn into_record(self, line: u64) -> Result<TrafficRecord, LoadError> {
        let holiday = match text(self.holiday) {
            h if h.is_empty() => "None".to_string(),
            h => h,
        };

        let raw_date_time = text(self.date_time);
        let date_time = parse_date_time(&raw_date_time).ok_or_else(|| LoadError::InvalidTimestamp {
            line,
            value: raw_date_time.clone(),
        })?;

        let clouds = whole_number(line, "clouds_all", self.clouds_all, 100.0)?;
        let volume = whole_number(line, "traffic_volume", self.traffic_volume, u32::MAX as f64)?;

        Ok(TrafficRecord {
            holiday,
            temp_k: number(line, "temp", self.temp)?,
            rain_1h_mm: number(line, "rain_1h", self.rain_1h)?,
            snow_1h_mm: number(line, "snow_1h", self.snow_1h)?,
            clouds_all_pct: clouds as u8,
            weather_main: text(self.weather_main),
            weather_description: text(self.weather_description),
            date_time,
            traffic_volume: volume as u32,
        })
    }
}

fn text(cell: Option<String>) -> String {
    cell.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn number(line: u64, column: &'static str, cell: Option<String>) -> Result<f64, LoadError> {
    let value = text(cell);
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(LoadError::InvalidNumber {
            line,
            column,
            value,
        }),
    }
}

/// A number rounded to the nearest integer, which must land in `0..=max`.
fn whole_number(
    line: u64,
    column: &'static str,
    cell: Option<String>,
    max: f64,
) -> Result<f64, LoadError> {
    let raw = cell.clone();
    let n = number(line, column, cell)?.round();
    if !(0.0..=max).contains(&n) {
        return Err(LoadError::InvalidNumber {
            line,
            column,
            value: text(raw),
        });
    }
    Ok(n)
}

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Loads every record from the CSV file at `path`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_path(path: &Path) -> Result<Vec<TrafficRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path)?;
    load_bytes(&bytes)
}

/// Loads records from in-memory CSV content, plain or gzip-compressed.
pub fn load_bytes(bytes: &[u8]) -> Result<Vec<TrafficRecord>, LoadError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        load_reader(GzDecoder::new(bytes))
    } else {
        load_reader(bytes)
    }
}

/// Loads records from any reader yielding plain CSV.
pub fn load_reader<R: Read>(reader: R) -> Result<Vec<TrafficRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut raw = StringRecord::new();
    let mut out = Vec::new();

    while rdr.read_record(&mut raw)? {
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: RawRow = raw.deserialize(Some(&headers))?;
        out.push(row.into_record(line)?);
    }

    debug!(records = out.len(), "Traffic CSV loaded");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    const HEADER: &str = "holiday,temp,rain_1h,snow_1h,clouds_all,weather_main,weather_description,date_time,traffic_volume";

    fn csv_with(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s.push('\n');
        s
    }

    #[test]
    fn test_load_full_row() {
        let data = csv_with(&["None,288.28,0.0,0.0,40,Clouds,scattered clouds,02-10-2012 09:00,5545"]);
        let rows = load_bytes(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.holiday, "None");
        assert_eq!(r.temp_k, 288.28);
        assert_eq!(r.clouds_all_pct, 40);
        assert_eq!(r.weather_main, "Clouds");
        assert_eq!(r.weather_description, "scattered clouds");
        assert_eq!(
            r.date_time,
            NaiveDate::from_ymd_opt(2012, 10, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(r.traffic_volume, 5545);
    }

    #[test]
    fn test_blank_fields_default() {
        let data = csv_with(&[" ,,,,,,,02-10-2012 10:00,"]);
        let rows = load_bytes(data.as_bytes()).unwrap();

        let r = &rows[0];
        assert_eq!(r.holiday, "None");
        assert_eq!(r.temp_k, 0.0);
        assert_eq!(r.rain_1h_mm, 0.0);
        assert_eq!(r.clouds_all_pct, 0);
        assert_eq!(r.weather_main, "");
        assert_eq!(r.traffic_volume, 0);
    }

    #[test]
    fn test_rounding_of_volume_and_clouds() {
        let data = csv_with(&["Columbus Day,273.1,0.25,0,74.6,Rain,light rain,08-10-2012 07:30,4999.5"]);
        let rows = load_bytes(data.as_bytes()).unwrap();

        assert_eq!(rows[0].holiday, "Columbus Day");
        assert_eq!(rows[0].clouds_all_pct, 75);
        assert_eq!(rows[0].traffic_volume, 5000);
        assert_eq!(rows[0].date_time.minute(), 30);
    }

    #[test]
    fn test_missing_columns_are_blank() {
        let data = "date_time,traffic_volume\n2012-10-02 09:00:00,100\n";
        let rows = load_bytes(data.as_bytes()).unwrap();

        assert_eq!(rows[0].holiday, "None");
        assert_eq!(rows[0].weather_main, "");
        assert_eq!(rows[0].hour(), 9);
        assert_eq!(rows[0].traffic_volume, 100);
    }

    #[test]
    fn test_invalid_timestamp_reports_line() {
        let data = csv_with(&[
            "None,280,0,0,1,Clear,sky is clear,02-10-2012 09:00,10",
            "None,280,0,0,1,Clear,sky is clear,not a date,10",
        ]);

        match load_bytes(data.as_bytes()) {
            Err(LoadError::InvalidTimestamp { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected InvalidTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number() {
        let data = csv_with(&["None,warm,0,0,1,Clear,sky is clear,02-10-2012 09:00,10"]);
        assert!(matches!(
            load_bytes(data.as_bytes()),
            Err(LoadError::InvalidNumber { column: "temp", .. })
        ));
    }

    #[test]
    fn test_gzip_input() {
        let data = csv_with(&["None,280,0,0,1,Clear,sky is clear,06-10-2012 12:00,321"]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let rows = load_bytes(&compressed).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_weekend());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("traffic_stats_does_not_exist.csv");
        assert!(matches!(load_path(&path), Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_out_of_range_numbers_rejected() {
        let cases = [
            ("None,280,0,0,1,Clear,sky is clear,02-10-2012 09:00,1e12", "traffic_volume"),
            ("None,280,0,0,1,Clear,sky is clear,02-10-2012 09:00,-5", "traffic_volume"),
            ("None,280,0,0,1,Clear,sky is clear,02-10-2012 09:00,NaN", "traffic_volume"),
            ("None,280,0,0,inf,Clear,sky is clear,02-10-2012 09:00,10", "clouds_all"),
            ("None,280,0,0,101,Clear,sky is clear,02-10-2012 09:00,10", "clouds_all"),
            ("None,NaN,0,0,1,Clear,sky is clear,02-10-2012 09:00,10", "temp"),
        ];

        for (row, expected) in cases {
            match load_bytes(csv_with(&[row]).as_bytes()) {
                Err(LoadError::InvalidNumber { line, column, .. }) => {
                    assert_eq!(line, 2);
                    assert_eq!(column, expected);
                }
                other => panic!("expected InvalidNumber for {:?}, got {:?}", row, other),
            }
        }
    }

    #[test]
    fn test_range_edges_accepted() {
        let data = csv_with(&["None,280,0,0,100.4,Clear,sky is clear,02-10-2012 09:00,-0.4"]);
        let rows = load_bytes(data.as_bytes()).unwrap();
        assert_eq!(rows[0].clouds_all_pct, 100);
        assert_eq!(rows[0].traffic_volume, 0);
    }
}
