//! LinkedIn discovery: find profiles, jobs and posts by parameters instead of URLs.

use crate::error::{Error, Result};
use crate::platform::{LINKEDIN_JOBS, LINKEDIN_POSTS, LINKEDIN_PROFILES};
use crate::scrapers::{DatasetScraper, ScrapeOptions};
use crate::types::ScrapeResult;
use crate::validation::{validate_non_empty, validate_url};
use serde::Serialize;
use serde_json::{json, Value};

/// Job search criteria. Only `keyword` or `location` is required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobSearch {
    /// Job title or keywords.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// City or region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Two-letter country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Posting age, e.g. `"Past week"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    /// e.g. `"Full-time"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    /// e.g. `"Entry level"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Only remote positions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<bool>,
    /// Hiring company name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl JobSearch {
    /// Search by keyword.
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Default::default()
        }
    }

    /// Narrow to a location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Only remote positions.
    pub fn remote(mut self, remote: bool) -> Self {
        self.remote = Some(remote);
        self
    }

    fn to_item(&self) -> Result<Value> {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !has(&self.keyword) && !has(&self.location) {
            return Err(Error::Validation(
                "job search needs a keyword or a location".into(),
            ));
        }
        Ok(serde_json::to_value(self)?)
    }
}

/// LinkedIn discovery, reached through `client.search().linkedin()`.
#[derive(Debug, Clone)]
pub struct LinkedInSearch {
    runner: DatasetScraper,
}

impl LinkedInSearch {
    pub(crate) fn new(runner: DatasetScraper) -> Self {
        Self { runner }
    }

    /// Replace the polling options.
    pub fn options(mut self, options: ScrapeOptions) -> Self {
        self.runner = self.runner.with_options(options);
        self
    }

    /// Find profiles by name.
    pub async fn profiles(&self, first_name: &str, last_name: &str) -> Result<ScrapeResult> {
        validate_non_empty("first_name", first_name)?;
        validate_non_empty("last_name", last_name)?;
        let payload = vec![json!({
            "firstName": first_name.trim(),
            "lastName": last_name.trim(),
        })];
        self.runner.run(&LINKEDIN_PROFILES, &payload).await
    }

    /// Find job postings matching `search`.
    pub async fn jobs(&self, search: &JobSearch) -> Result<ScrapeResult> {
        let payload = vec![search.to_item()?];
        self.runner.run(&LINKEDIN_JOBS, &payload).await
    }

    /// Find posts by a profile, optionally within `YYYY-MM-DD` dates.
    pub async fn posts(
        &self,
        profile_url: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ScrapeResult> {
        let payload = vec![posts_item(profile_url, start_date, end_date)?];
        self.runner.run(&LINKEDIN_POSTS, &payload).await
    }
}

fn posts_item(profile_url: &str, start_date: Option<&str>, end_date: Option<&str>) -> Result<Value> {
    validate_url(profile_url)?;

    let mut item = json!({ "url": profile_url.trim() });
    for (key, date) in [("start_date", start_date), ("end_date", end_date)] {
        if let Some(date) = date {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                Error::Validation(format!("{} must be YYYY-MM-DD, got {:?}", key, date))
            })?;
            item[key] = Value::String(date.to_string());
        }
    }
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_search_item() {
        let item = JobSearch::keyword("rust developer")
            .location("Berlin")
            .remote(true)
            .to_item()
            .unwrap();
        assert_eq!(
            item,
            json!({"keyword": "rust developer", "location": "Berlin", "remote": true})
        );
    }

    #[test]
    fn test_job_search_requires_criteria() {
        let err = JobSearch::default().to_item().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_posts_item_dates() {
        let item = posts_item(
            "https://www.linkedin.com/in/someone",
            Some("2024-01-01"),
            None,
        )
        .unwrap();
        assert_eq!(
            item,
            json!({"url": "https://www.linkedin.com/in/someone", "start_date": "2024-01-01"})
        );

        assert!(posts_item("https://www.linkedin.com/in/someone", Some("01/01/2024"), None).is_err());
        assert!(posts_item("not a url", None, None).is_err());
    }
}
