//! HTTP transport shared by every service of a [`Client`](crate::Client).
//!
//! One pooled `reqwest::Client` carries the bearer token, User-Agent and
//! per-request timeout. Requests are independent of each other: a failure or
//! timeout on one call never affects another in flight.

use crate::error::{Error, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Cap on the exponential backoff between network retries.
const MAX_BACKOFF_SECS: u64 = 30;

/// Bearer-authenticated HTTP transport.
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    token: String,
    max_retries: u32,
}

impl Transport {
    pub(crate) fn new(
        token: &str,
        base_url: String,
        timeout: Duration,
        max_retries: u32,
        user_agent: &str,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("API token contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|_| Error::Config("User-Agent contains invalid characters".into()))?,
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
            max_retries,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token with everything but its edges hidden.
    pub(crate) fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() > 8 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        } else {
            "***".to_string()
        }
    }

    /// GET `path` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let (status, body) = self.send_checked(Method::GET, path, query, None::<&()>).await?;
        decode(status, body)
    }

    /// POST a JSON body to `path` and decode the JSON response.
    pub(crate) async fn post_json<T, B>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let (status, text) = self.send_checked(Method::POST, path, query, Some(body)).await?;
        decode(status, text)
    }

    /// Send a request and return the status and raw body of a successful response.
    ///
    /// Non-success responses are converted with [`Error::from_response`].
    pub(crate) async fn send_checked<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<(u16, String)>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, query, body).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_response(response).await);
        }
        let text = response.text().await.map_err(Error::Http)?;
        Ok((status.as_u16(), text))
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 1;

        loop {
            let mut req = self.http.request(method.clone(), &url);
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(b) = body {
                req = req.json(b);
            }

            debug!(method = %method, url = %url, attempt = attempt, "Sending request");

            match req.send().await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_timeout() => return Err(Error::Timeout),
                // HTTP statuses are never retried here
                Err(e) if attempt <= self.max_retries && is_retryable(&method, &e) => {
                    let backoff = backoff(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        "Network error. Retrying in {:?}",
                        backoff
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("token", &self.masked_token())
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn decode<T: DeserializeOwned>(status: u16, body: String) -> Result<T> {
    serde_json::from_str(&body)
        .map_err(|e| Error::malformed(status, format!("Failed to parse response: {}", e), body))
}

/// A GET may be repeated after any network failure. Anything else is only
/// repeated when no connection was made, so a written POST is never re-sent.
fn is_retryable(method: &Method, err: &reqwest::Error) -> bool {
    *method == Method::GET || err.is_connect()
}

/// Exponential backoff with a little jitter so parallel callers spread out.
fn backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(5);
    let base = Duration::from_secs(2u64.pow(exponent).min(MAX_BACKOFF_SECS));
    base + Duration::from_millis(rand::rng().random_range(0..250))
}
