//! Amazon products, reviews and sellers.

use super::{DatasetScraper, ScrapeOptions};
use crate::error::Result;
use crate::platform::{AMAZON_PRODUCTS, AMAZON_REVIEWS, AMAZON_SELLERS};
use crate::types::{ScrapeResult, Targets};
use crate::validation::validate_targets;
use crate::workflow::collapse_single;
use serde::Serialize;
use serde_json::Value;

/// Filters applied to every URL of a reviews request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewFilters {
    /// Only reviews from the last N days.
    #[serde(rename = "pastDays", skip_serializing_if = "Option::is_none")]
    pub past_days: Option<u32>,
    /// Only reviews mentioning this keyword.
    #[serde(rename = "keyWord", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Maximum number of reviews per product.
    #[serde(rename = "numOfReviews", skip_serializing_if = "Option::is_none")]
    pub num_of_reviews: Option<u32>,
}

#[derive(Serialize)]
struct ReviewItem<'a> {
    url: &'a str,
    #[serde(flatten)]
    filters: &'a ReviewFilters,
}

/// Amazon scraper.
#[derive(Debug, Clone)]
pub struct AmazonScraper {
    runner: DatasetScraper,
}

impl AmazonScraper {
    pub(crate) fn new(runner: DatasetScraper) -> Self {
        Self { runner }
    }

    /// Replace the polling options.
    pub fn options(mut self, options: ScrapeOptions) -> Self {
        self.runner = self.runner.with_options(options);
        self
    }

    /// Scrape product pages.
    pub async fn products(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&AMAZON_PRODUCTS, urls.into()).await
    }

    /// Scrape product reviews, narrowed by `filters`.
    pub async fn reviews(
        &self,
        urls: impl Into<Targets>,
        filters: &ReviewFilters,
    ) -> Result<ScrapeResult> {
        let urls = urls.into();
        validate_targets(&urls)?;

        let payload = urls
            .iter()
            .map(|url| serde_json::to_value(ReviewItem { url, filters }))
            .collect::<serde_json::Result<Vec<Value>>>()?;

        let result = self.runner.run(&AMAZON_REVIEWS, &payload).await?;
        Ok(collapse_single(result, &urls))
    }

    /// Scrape seller pages.
    pub async fn sellers(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&AMAZON_SELLERS, urls.into()).await
    }
}
