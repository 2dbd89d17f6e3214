mod client;
mod basic;
pub mod auth;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::Result;
use serde::de::DeserializeOwned;

/// Issues a single GET against `url` and decodes the JSON response body.
///
/// Exactly one outbound request per call: no retries, no caching. Non-2xx
/// statuses are reported as errors carrying the status line.
///
/// Error detail never includes the request's query string: an auth wrapper
/// may have appended the API key to it, and these errors end up in the log.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .map_err(reqwest::Error::without_url)?;

    if !resp.status().is_success() {
        let mut target = resp.url().clone();
        target.set_query(None);
        anyhow::bail!("request to {target} returned status {}", resp.status());
    }

    Ok(resp.json().await.map_err(reqwest::Error::without_url)?)
}
