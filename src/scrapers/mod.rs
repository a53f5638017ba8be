//! Platform scrapers built on the dataset workflow.
//!
//! ```rust,no_run
//! # async fn run(client: brightdata::Client) -> Result<(), brightdata::Error> {
//! use brightdata::ScrapeOptions;
//! use std::time::Duration;
//!
//! let result = client
//!     .scrape()
//!     .amazon()
//!     .options(ScrapeOptions::default().timeout(Duration::from_secs(300)))
//!     .products("https://www.amazon.com/dp/B0CRMZHDG8")
//!     .await?;
//! println!("{:?}", result.data);
//! # Ok(())
//! # }
//! ```

mod amazon;
mod chatgpt;
mod linkedin;

pub use amazon::{AmazonScraper, ReviewFilters};
pub use chatgpt::{ChatGptPrompt, ChatGptScraper};
pub use linkedin::LinkedInScraper;

use crate::dataset::DatasetClient;
use crate::error::Result;
use crate::platform::PlatformConfig;
use crate::poller::DEFAULT_POLL_INTERVAL;
use crate::transport::Transport;
use crate::types::{ScrapeResult, Targets};
use crate::unlocker::{Unlocker, UnlockerOptions};
use crate::validation::validate_targets;
use crate::workflow::{collapse_single, Normalizer};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Polling knobs for dataset scrapers.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Pause between status checks.
    pub poll_interval: Duration,
    /// Polling deadline; the platform minimum when unset.
    pub timeout: Option<Duration>,
    /// Ask the provider to include per-record errors in the output.
    pub include_errors: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            include_errors: true,
        }
    }
}

impl ScrapeOptions {
    /// Set the pause between status checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the polling deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Include or drop per-record errors.
    pub fn include_errors(mut self, include: bool) -> Self {
        self.include_errors = include;
        self
    }
}

/// Runs a [`PlatformConfig`] through the workflow with a set of options.
#[derive(Debug, Clone)]
pub struct DatasetScraper {
    api: DatasetClient,
    options: ScrapeOptions,
}

impl DatasetScraper {
    pub(crate) fn new(api: DatasetClient) -> Self {
        Self {
            api,
            options: ScrapeOptions::default(),
        }
    }

    pub(crate) fn with_options(mut self, options: ScrapeOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate `urls`, submit one `{"url": ...}` item per URL and collapse
    /// single-input results.
    pub async fn scrape(&self, config: &PlatformConfig, urls: Targets) -> Result<ScrapeResult> {
        validate_targets(&urls)?;
        let payload: Vec<Value> = urls.iter().map(|url| json!({ "url": url })).collect();
        let result = self.run(config, &payload).await?;
        Ok(collapse_single(result, &urls))
    }

    /// Submit a prepared payload; no validation and no collapsing.
    pub async fn run(&self, config: &PlatformConfig, payload: &[Value]) -> Result<ScrapeResult> {
        let timeout = self.options.timeout.unwrap_or(config.min_poll_timeout);
        let normalize: &Normalizer = &config.normalize;

        config
            .executor(self.api.clone())
            .execute(
                payload,
                config.dataset_id,
                self.options.poll_interval,
                timeout,
                self.options.include_errors,
                Some(normalize),
            )
            .await
    }
}

/// Entry point for `client.scrape()`.
#[derive(Debug, Clone)]
pub struct ScrapeService {
    transport: Arc<Transport>,
    unlocker_zone: String,
}

impl ScrapeService {
    pub(crate) fn new(transport: Arc<Transport>, unlocker_zone: String) -> Self {
        Self {
            transport,
            unlocker_zone,
        }
    }

    fn dataset(&self) -> DatasetScraper {
        DatasetScraper::new(DatasetClient::new(self.transport.clone()))
    }

    /// Amazon products, reviews and sellers.
    pub fn amazon(&self) -> AmazonScraper {
        AmazonScraper::new(self.dataset())
    }

    /// LinkedIn profiles, companies, jobs and posts.
    pub fn linkedin(&self) -> LinkedInScraper {
        LinkedInScraper::new(self.dataset())
    }

    /// ChatGPT prompts.
    pub fn chatgpt(&self) -> ChatGptScraper {
        ChatGptScraper::new(self.dataset())
    }

    /// Scrape URLs with any registered operation, e.g. one found with
    /// [`platform::lookup`](crate::platform::lookup).
    pub async fn with_config(
        &self,
        config: &PlatformConfig,
        urls: impl Into<Targets>,
        options: ScrapeOptions,
    ) -> Result<ScrapeResult> {
        self.dataset()
            .with_options(options)
            .scrape(config, urls.into())
            .await
    }

    /// Fetch one page through the Web Unlocker zone.
    pub async fn url(&self, url: &str, options: &UnlockerOptions) -> Result<ScrapeResult> {
        self.unlocker().fetch(url, options).await
    }

    /// Fetch several pages through the Web Unlocker zone, concurrently.
    pub async fn urls(&self, urls: &[&str], options: &UnlockerOptions) -> Result<Vec<ScrapeResult>> {
        self.unlocker().fetch_many(urls, options).await
    }

    fn unlocker(&self) -> Unlocker {
        Unlocker::new(self.transport.clone(), self.unlocker_zone.clone())
    }
}
