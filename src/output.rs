//! Output formatting and persistence for traffic reports.
//!
//! Supports pretty-printing, JSON files (optionally gzip-compressed), and a
//! CSV run history.

use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::report::{RunSummary, TrafficReport};
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &TrafficReport) {
    debug!("{:#?}", report);
}

/// Logs any serializable view as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Encodes `value` as pretty JSON, gzip-compressed when `gzip` is set.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let body = serde_json::to_vec_pretty(value)?;
    if !gzip {
        return Ok(body);
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok(encoder.finish()?)
}

/// Writes `value` as JSON to `path`, creating parent directories.
///
/// With `gzip` the content is compressed and `.gz` is appended to the file
/// name unless already present. Returns the path actually written.
pub fn write_json(path: &Path, value: &impl Serialize, gzip: bool) -> Result<PathBuf> {
    let path = if gzip && path.extension().and_then(|e| e.to_str()) != Some("gz") {
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        PathBuf::from(name)
    } else {
        path.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let body = encode_json(value, gzip)?;
    fs::write(&path, &body)?;
    info!(path = %path.display(), bytes = body.len(), gzip, "Report written");

    Ok(path)
}

/// Appends a [`RunSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending run summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::record::tests::record_at;
    use flate2::read::GzDecoder;
    use std::env;
    use std::io::Read;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_report() -> TrafficReport {
        let rows = vec![
            record_at(2012, 10, 8, 8, 100, "Clear"),
            record_at(2012, 10, 6, 9, 300, "Rain"),
        ];
        TrafficReport::build(&rows, &ReportConfig::default()).unwrap()
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_report()).unwrap();
    }

    #[test]
    fn test_write_json_plain() {
        let path = temp_path("traffic_stats_test_report/report.json");
        let _ = fs::remove_file(&path);

        let written = write_json(&path, &sample_report(), false).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["record_count"], 2);
        assert_eq!(json["peak_overall"]["hour"], 9);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_gzip_appends_extension() {
        let path = temp_path("traffic_stats_test_report_gz.json");
        let written = write_json(&path, &sample_report(), true).unwrap();
        assert_eq!(written, temp_path("traffic_stats_test_report_gz.json.gz"));

        let compressed = fs::read(&written).unwrap();
        let mut content = String::new();
        GzDecoder::new(&compressed[..])
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("\"by_weather\""));

        fs::remove_file(&written).unwrap();
    }

    #[test]
    fn test_append_summary_creates_file() {
        let path = temp_path("traffic_stats_test_history_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let summary = RunSummary::from_report("a.csv", &sample_report());
        append_summary(&path, &summary).unwrap();

        assert!(path.exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("traffic_stats_test_history_header.csv");
        let _ = fs::remove_file(&path);

        let summary = RunSummary::from_report("a.csv", &sample_report());
        append_summary(&path, &summary).unwrap();
        append_summary(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content
            .lines()
            .filter(|l| l.starts_with("generated_at"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
