//! LinkedIn profiles, companies, jobs and posts by URL.

use super::{DatasetScraper, ScrapeOptions};
use crate::error::Result;
use crate::platform::{LINKEDIN_COMPANIES, LINKEDIN_JOBS, LINKEDIN_POSTS, LINKEDIN_PROFILES};
use crate::types::{ScrapeResult, Targets};

/// LinkedIn scraper.
#[derive(Debug, Clone)]
pub struct LinkedInScraper {
    runner: DatasetScraper,
}

impl LinkedInScraper {
    pub(crate) fn new(runner: DatasetScraper) -> Self {
        Self { runner }
    }

    /// Replace the polling options.
    pub fn options(mut self, options: ScrapeOptions) -> Self {
        self.runner = self.runner.with_options(options);
        self
    }

    /// Scrape profile pages (`linkedin.com/in/...`).
    pub async fn profiles(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&LINKEDIN_PROFILES, urls.into()).await
    }

    /// Scrape company pages (`linkedin.com/company/...`).
    pub async fn companies(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&LINKEDIN_COMPANIES, urls.into()).await
    }

    /// Scrape job postings (`linkedin.com/jobs/view/...`).
    pub async fn jobs(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&LINKEDIN_JOBS, urls.into()).await
    }

    /// Scrape posts (`linkedin.com/posts/...`).
    pub async fn posts(&self, urls: impl Into<Targets>) -> Result<ScrapeResult> {
        self.runner.scrape(&LINKEDIN_POSTS, urls.into()).await
    }
}
