//! Retrieval of raw CSV bytes from a local path or an HTTP(S) URL.

mod api_key;
mod basic;

pub use api_key::ApiKey;
pub use basic::BasicClient;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Request, Response};
use tracing::debug;

/// Executes prepared requests. Wrappers such as [`ApiKey`] decorate another
/// client before delegating to it.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}

/// Environment variable holding an optional bearer token for URL sources.
pub const SOURCE_TOKEN_ENV: &str = "TRAFFIC_SOURCE_TOKEN";

pub async fn fetch_bytes<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<Bytes> {
    let req = Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {} failed with status {}", url, status);
    }
    Ok(resp.bytes().await?)
}

pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Wraps `inner` in a bearer-token [`ApiKey`] when a non-empty token is given.
pub fn source_client<C: HttpClient + 'static>(
    inner: C,
    token: Option<&str>,
) -> Result<Box<dyn HttpClient>> {
    match token {
        Some(token) if !token.is_empty() => Ok(Box::new(ApiKey::bearer(inner, token)?)),
        _ => Ok(Box::new(inner)),
    }
}

/// Fetches a dataset URL, sending a bearer token when [`SOURCE_TOKEN_ENV`] is set.
#[tracing::instrument(skip(url), fields(url = %url))]
pub async fn fetch_url(url: &str) -> Result<Bytes> {
    let token = std::env::var(SOURCE_TOKEN_ENV).ok();
    let client = source_client(BasicClient::new()?, token.as_deref())?;

    let bytes = fetch_bytes(client.as_ref(), url)
        .await
        .with_context(|| format!("fetching {}", url))?;
    debug!(bytes = bytes.len(), "Source fetched");
    Ok(bytes)
}
