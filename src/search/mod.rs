//! Search: engine result pages plus LinkedIn and ChatGPT discovery.
//!
//! ```rust,no_run
//! # async fn run(client: brightdata::Client) -> Result<(), brightdata::Error> {
//! use brightdata::SerpOptions;
//!
//! let result = client
//!     .search()
//!     .google("rust web scraping", &SerpOptions::default().country("us"))
//!     .await?;
//! for row in result.data.iter().flat_map(|d| d["results"].as_array()).flatten() {
//!     println!("{} {}", row["position"], row["title"]);
//! }
//! # Ok(())
//! # }
//! ```

mod linkedin;
mod serp;

pub use linkedin::{JobSearch, LinkedInSearch};
pub use serp::{normalize_serp, Device, SearchEngine, SerpOptions};

use crate::dataset::DatasetClient;
use crate::error::{Error, Result};
use crate::scrapers::{ChatGptPrompt, ChatGptScraper, DatasetScraper};
use crate::transport::Transport;
use crate::types::{CollectionMethod, ScrapeResult};
use crate::unlocker::{parse_json_body, proxy_request};
use crate::validation::validate_non_empty;
use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

/// Entry point for `client.search()`.
#[derive(Debug, Clone)]
pub struct SearchService {
    transport: Arc<Transport>,
    serp_zone: String,
}

impl SearchService {
    pub(crate) fn new(transport: Arc<Transport>, serp_zone: String) -> Self {
        Self {
            transport,
            serp_zone,
        }
    }

    /// Search Google.
    pub async fn google(&self, query: &str, options: &SerpOptions) -> Result<ScrapeResult> {
        self.engine(SearchEngine::Google, query, options).await
    }

    /// Search Bing.
    pub async fn bing(&self, query: &str, options: &SerpOptions) -> Result<ScrapeResult> {
        self.engine(SearchEngine::Bing, query, options).await
    }

    /// Search Yandex.
    pub async fn yandex(&self, query: &str, options: &SerpOptions) -> Result<ScrapeResult> {
        self.engine(SearchEngine::Yandex, query, options).await
    }

    /// Run several Google queries concurrently; results keep query order.
    pub async fn google_many(
        &self,
        queries: &[&str],
        options: &SerpOptions,
    ) -> Result<Vec<ScrapeResult>> {
        self.engine_many(SearchEngine::Google, queries, options).await
    }

    /// Run several Bing queries concurrently.
    pub async fn bing_many(
        &self,
        queries: &[&str],
        options: &SerpOptions,
    ) -> Result<Vec<ScrapeResult>> {
        self.engine_many(SearchEngine::Bing, queries, options).await
    }

    /// Run several Yandex queries concurrently.
    pub async fn yandex_many(
        &self,
        queries: &[&str],
        options: &SerpOptions,
    ) -> Result<Vec<ScrapeResult>> {
        self.engine_many(SearchEngine::Yandex, queries, options).await
    }

    /// Search any supported engine.
    ///
    /// Transport failures come back as a failed result. A body that is not
    /// JSON is left as a string.
    pub async fn engine(
        &self,
        engine: SearchEngine,
        query: &str,
        options: &SerpOptions,
    ) -> Result<ScrapeResult> {
        validate_non_empty("query", query)?;
        let url = engine.search_url(query.trim(), options)?;
        let zone = options.zone.as_deref().unwrap_or(&self.serp_zone);
        debug!(engine = engine.name(), zone = zone, "Searching");

        let mut result =
            proxy_request(&self.transport, zone, &url, None, CollectionMethod::Serp).await;
        result.platform = Some(engine.name().to_string());

        if result.success {
            parse_json_body(&mut result);
            if let Some(data) = result.data.take() {
                let normalized = normalize_serp(data)?;
                result.row_count = normalized["results"].as_array().map(Vec::len).or(Some(1));
                result.data = Some(normalized);
            }
        }
        Ok(result)
    }

    async fn engine_many(
        &self,
        engine: SearchEngine,
        queries: &[&str],
        options: &SerpOptions,
    ) -> Result<Vec<ScrapeResult>> {
        if queries.is_empty() {
            return Err(Error::Validation("query list cannot be empty".into()));
        }
        for query in queries {
            validate_non_empty("query", query)?;
        }

        join_all(
            queries
                .iter()
                .map(|query| self.engine(engine, query, options)),
        )
        .await
        .into_iter()
        .collect()
    }

    /// LinkedIn discovery by name, job criteria or profile.
    pub fn linkedin(&self) -> LinkedInSearch {
        LinkedInSearch::new(self.dataset())
    }

    /// Send a prompt to ChatGPT.
    pub async fn chatgpt(&self, prompt: ChatGptPrompt) -> Result<ScrapeResult> {
        ChatGptScraper::new(self.dataset()).prompt(prompt).await
    }

    fn dataset(&self) -> DatasetScraper {
        DatasetScraper::new(DatasetClient::new(self.transport.clone()))
    }
}
