//! Single-request page fetching through a Bright Data proxy zone.
//!
//! Used directly by `client.scrape().url(...)` and underneath the SERP
//! search engines.

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{CollectionMethod, ResultStatus, ScrapeResult};
use crate::validation::validate_url;
use chrono::Utc;
use futures::future::join_all;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// How the page body is returned in `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    /// The body as a string.
    #[default]
    Raw,
    /// The body parsed as JSON, falling back to a string.
    Json,
}

/// Options for Web Unlocker requests.
#[derive(Debug, Clone, Default)]
pub struct UnlockerOptions {
    /// Zone to route through; the client's unlocker zone when unset.
    pub zone: Option<String>,
    /// Two-letter country for the exit node.
    pub country: Option<String>,
    /// Body format.
    pub format: ResponseFormat,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    zone: &'a str,
    url: &'a str,
    format: &'static str,
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<&'a str>,
}

/// Send `url` through `zone` and wrap the outcome in a result record.
///
/// Request failures become failed results carrying the error text.
pub(crate) async fn proxy_request(
    transport: &Transport,
    zone: &str,
    url: &str,
    country: Option<&str>,
    method: CollectionMethod,
) -> ScrapeResult {
    let sent_at = Utc::now();
    let body = ProxyRequest {
        zone,
        url,
        format: "raw",
        method: "GET",
        country,
    };

    let mut result = match transport
        .send_checked(Method::POST, "/request", &[], Some(&body))
        .await
    {
        Ok((_, text)) => {
            debug!(url = url, zone = zone, bytes = text.len(), "Proxy request succeeded");
            let mut ok = ScrapeResult::succeeded(Value::String(text), method, sent_at);
            ok.row_count = Some(1);
            ok.data_fetched_at = Some(Utc::now());
            ok
        }
        Err(e) => {
            warn!(url = url, zone = zone, error = %e, "Proxy request failed");
            ScrapeResult::failed(
                ResultStatus::Error,
                format!("Request failed: {}", e),
                method,
                sent_at,
            )
        }
    };
    result.url = Some(url.to_string());
    result
}

/// Parse a string body as JSON in place; non-JSON bodies stay strings.
pub(crate) fn parse_json_body(result: &mut ScrapeResult) {
    if let Some(Value::String(text)) = &result.data {
        if let Ok(parsed) = serde_json::from_str::<Value>(text) {
            result.data = Some(parsed);
        }
    }
}

pub(crate) struct Unlocker {
    transport: Arc<Transport>,
    zone: String,
}

impl Unlocker {
    pub(crate) fn new(transport: Arc<Transport>, zone: String) -> Self {
        Self { transport, zone }
    }

    pub(crate) async fn fetch(&self, url: &str, options: &UnlockerOptions) -> Result<ScrapeResult> {
        validate_url(url)?;
        let zone = options.zone.as_deref().unwrap_or(&self.zone);

        let mut result = proxy_request(
            &self.transport,
            zone,
            url.trim(),
            options.country.as_deref(),
            CollectionMethod::WebUnlocker,
        )
        .await;

        if options.format == ResponseFormat::Json {
            parse_json_body(&mut result);
        }
        Ok(result)
    }

    pub(crate) async fn fetch_many(
        &self,
        urls: &[&str],
        options: &UnlockerOptions,
    ) -> Result<Vec<ScrapeResult>> {
        if urls.is_empty() {
            return Err(Error::Validation("URL list cannot be empty".into()));
        }
        for url in urls {
            validate_url(url)?;
        }

        join_all(urls.iter().map(|url| self.fetch(url, options)))
            .await
            .into_iter()
            .collect()
    }
}
