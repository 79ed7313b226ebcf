//! CLI entry point for the traffic statistics tool.
//!
//! Provides subcommands for building a full report from a traffic CSV
//! (file or URL), and for quick looks at peak hours, hourly averages and
//! weather averages.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use traffic_stats::analysis::{
    average_volume_by_hour, average_volume_by_hour_weekday_vs_weekend,
    average_volume_by_weather_main, peak_hour_by_average, peak_hour_weekday, peak_hour_weekend,
};
use traffic_stats::{
    config::ReportConfig,
    fetch::{fetch_url, is_url},
    loader::{load_bytes, load_path},
    output::{append_summary, print_json, print_pretty, write_json},
    publish::{report_key, s3_client, write_json_to_s3},
    record::TrafficRecord,
    report::{RunSummary, TrafficReport},
};

#[derive(Parser)]
#[command(name = "traffic_stats")]
#[command(about = "Descriptive statistics over hourly traffic volume data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full report for a traffic CSV file or URL
    Report {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// JSON file to write the report to
        #[arg(short, long, default_value = "reports/traffic_report.json")]
        output: PathBuf,

        /// Gzip compress the JSON report
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Optional: CSV file to append a one-line run summary to
        #[arg(long)]
        history: Option<PathBuf>,

        /// Print LaTeX figure blocks for every figure
        #[arg(long, default_value_t = false)]
        latex: bool,

        /// Optional: JSON report configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Optional: S3 bucket name to upload the report to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Object key for the S3 upload (defaults to a dated key)
        #[arg(long, requires = "s3_bucket")]
        s3_key: Option<String>,
    },
    /// Show the hour with the highest average volume
    Peak {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Which days to consider
        #[arg(short, long, value_enum, default_value_t = Scope::All)]
        scope: Scope,
    },
    /// Show average volume per hour of day
    Hourly {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Show zero-filled weekday and weekend curves instead
        #[arg(long, default_value_t = false)]
        by_day_type: bool,
    },
    /// Show average volume per weather condition
    Weather {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scope {
    All,
    Weekday,
    Weekend,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/traffic_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("traffic_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            source,
            output,
            gzip,
            history,
            latex,
            config,
            s3_bucket,
            s3_key,
        } => {
            let config = ReportConfig::load_or_default(config.as_deref())?;
            let records = load_records(&source).await?;
            let report = TrafficReport::build(&records, &config)?;
            print_pretty(&report);

            for figure in &report.figures {
                info!(number = figure.number, image = %figure.image_path, "{}", figure.caption);
            }
            if latex {
                println!("{}", report.latex());
            }

            write_json(&output, &report, gzip)?;

            if let Some(history) = history {
                append_summary(&history, &RunSummary::from_report(&source, &report))?;
            }

            if let Some(bucket) = s3_bucket {
                let key = s3_key.unwrap_or_else(|| report_key(report.generated_at.date_naive()));
                let s3 = s3_client().await;
                write_json_to_s3(&s3, &bucket, &key, &report, gzip).await?;
            }
        }
        Commands::Peak { source, scope } => {
            let records = load_records(&source).await?;
            let peak = match scope {
                Scope::All => peak_hour_by_average(&records)?,
                Scope::Weekday => peak_hour_weekday(&records)?,
                Scope::Weekend => peak_hour_weekend(&records)?,
            };
            info!(
                scope = ?scope,
                hour = peak.hour,
                average_volume = peak.average_volume,
                "Peak hour"
            );
        }
        Commands::Hourly {
            source,
            by_day_type,
        } => {
            let records = load_records(&source).await?;
            if by_day_type {
                print_json(&average_volume_by_hour_weekday_vs_weekend(&records))?;
            } else {
                print_json(&average_volume_by_hour(&records))?;
            }
        }
        Commands::Weather { source } => {
            let records = load_records(&source).await?;
            print_json(&average_volume_by_weather_main(&records))?;
        }
    }

    Ok(())
}

/// Loads traffic records from a local file path or fetches them over HTTP.
#[tracing::instrument(skip(source), fields(source = %source))]
async fn load_records(source: &str) -> Result<Vec<TrafficRecord>> {
    let records = if is_url(source) {
        let bytes = fetch_url(source).await?;
        load_bytes(&bytes)?
    } else {
        load_path(Path::new(source))?
    };
    info!(records = records.len(), "Traffic records loaded");
    Ok(records)
}
