//! Rust SDK for the Bright Data API.
//!
//! Bright Data collects web data through asynchronous dataset jobs (trigger,
//! poll, fetch) and through single proxied requests (Web Unlocker, SERP).
//! This crate wraps both behind one client and returns every outcome as a
//! uniform [`ScrapeResult`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use brightdata::{Client, SerpOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), brightdata::Error> {
//!     let client = Client::from_env()?;
//!
//!     let product = client
//!         .scrape()
//!         .amazon()
//!         .products("https://www.amazon.com/dp/B0CRMZHDG8")
//!         .await?;
//!     println!("{:?} {:?}", product.status, product.data);
//!
//!     let serp = client
//!         .search()
//!         .google("rust async runtime", &SerpOptions::default())
//!         .await?;
//!     println!("{:?}", serp.data);
//!     Ok(())
//! }
//! ```
//!
//! # Custom datasets
//!
//! Any dataset id can be driven through the same workflow:
//!
//! ```rust,no_run
//! # async fn run(client: brightdata::Client) -> Result<(), brightdata::Error> {
//! use brightdata::{WorkflowExecutor, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
//! use serde_json::json;
//!
//! let result = WorkflowExecutor::new(client.datasets())
//!     .platform("custom")
//!     .execute(
//!         &[json!({"url": "https://example.com"})],
//!         "gd_xxxxxxxxxxxxxxxx",
//!         DEFAULT_POLL_INTERVAL,
//!         DEFAULT_POLL_TIMEOUT,
//!         true,
//!         None,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
mod client;
mod dataset;
mod error;
pub mod platform;
mod poller;
mod scrapers;
mod search;
mod transport;
mod types;
mod unlocker;
mod validation;
mod version;
mod workflow;

#[cfg(test)]
mod test_support;

pub use client::{Client, ClientBuilder, BASE_URL_ENV_VAR, TOKEN_ENV_VARS};
pub use dataset::{DatasetApi, DatasetClient};
pub use error::{Error, Result};
pub use platform::PlatformConfig;
pub use poller::{poll_until_ready, PollContext, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
pub use scrapers::{
    AmazonScraper, ChatGptPrompt, ChatGptScraper, DatasetScraper, LinkedInScraper, ReviewFilters,
    ScrapeOptions, ScrapeService,
};
pub use search::{
    normalize_serp, Device, JobSearch, LinkedInSearch, SearchEngine, SearchService, SerpOptions,
};
pub use types::*;
pub use unlocker::{ResponseFormat, UnlockerOptions};
pub use validation::validate_url;
pub use version::SDK_VERSION;
pub use workflow::{collapse_single, Normalizer, WorkflowExecutor, DEFAULT_COST_PER_RECORD};
