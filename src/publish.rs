//! Publishing reports to S3.

use crate::output::encode_json;
use anyhow::Result;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tracing::info;

/// Builds an S3 client from the standard AWS environment.
pub async fn s3_client() -> aws_sdk_s3::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_s3::Client::new(&config)
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
///
/// With `gzip` the body is compressed and sent with `Content-Encoding: gzip`.
#[tracing::instrument(skip(client, value), fields(bucket, key, gzip))]
pub async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
    gzip: bool,
) -> Result<()> {
    let body = encode_json(value, gzip)?;
    let size = body.len();

    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/json");
    if gzip {
        request = request.content_encoding("gzip");
    }
    request.send().await?;

    info!(bucket, key, bytes = size, "Report uploaded to S3");
    Ok(())
}

/// Default object key for a report generated at `date`.
pub fn report_key(date: chrono::NaiveDate) -> String {
    format!("reports/date={}/traffic_report.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_report_key() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(report_key(date), "reports/date=2024-03-09/traffic_report.json");
    }
}
