//! ChatGPT prompts collected through the dataset workflow.

use super::{DatasetScraper, ScrapeOptions};
use crate::error::{Error, Result};
use crate::platform::CHATGPT_PROMPTS;
use crate::types::ScrapeResult;
use crate::validation::validate_non_empty;
use crate::workflow::unwrap_single;
use serde::Serialize;
use serde_json::Value;

const CHATGPT_URL: &str = "https://chatgpt.com/";

/// One prompt to send.
#[derive(Debug, Clone, Serialize)]
pub struct ChatGptPrompt {
    /// Prompt text.
    pub prompt: String,
    /// Two-letter country the prompt is sent from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Let ChatGPT search the web before answering.
    pub web_search: bool,
    /// Follow-up prompt sent in the same conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_prompt: Option<String>,
}

impl ChatGptPrompt {
    /// A prompt with no country and web search off.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            country: None,
            web_search: false,
            additional_prompt: None,
        }
    }

    /// Set the country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Turn web search on or off.
    pub fn web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    /// Add a follow-up prompt.
    pub fn additional_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.additional_prompt = Some(prompt.into());
        self
    }

    fn to_item(&self) -> Result<Value> {
        validate_non_empty("prompt", &self.prompt)?;
        if let Some(country) = &self.country {
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::Validation(format!(
                    "country must be a two-letter code, got {:?}",
                    country
                )));
            }
        }

        let mut item = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut item {
            map.insert("url".to_string(), Value::String(CHATGPT_URL.to_string()));
        }
        Ok(item)
    }
}

/// ChatGPT scraper.
#[derive(Debug, Clone)]
pub struct ChatGptScraper {
    runner: DatasetScraper,
}

impl ChatGptScraper {
    pub(crate) fn new(runner: DatasetScraper) -> Self {
        Self { runner }
    }

    /// Replace the polling options.
    pub fn options(mut self, options: ScrapeOptions) -> Self {
        self.runner = self.runner.with_options(options);
        self
    }

    /// Send one prompt; a single answer comes back unwrapped.
    pub async fn prompt(&self, prompt: ChatGptPrompt) -> Result<ScrapeResult> {
        let payload = vec![prompt.to_item()?];
        let mut result = self.runner.run(&CHATGPT_PROMPTS, &payload).await?;
        unwrap_single(&mut result);
        Ok(result)
    }

    /// Send several prompts as one job; answers come back in prompt order.
    pub async fn prompts(&self, prompts: Vec<ChatGptPrompt>) -> Result<ScrapeResult> {
        if prompts.is_empty() {
            return Err(Error::Validation("prompt list cannot be empty".into()));
        }
        let payload = prompts
            .iter()
            .map(ChatGptPrompt::to_item)
            .collect::<Result<Vec<_>>>()?;
        self.runner.run(&CHATGPT_PROMPTS, &payload).await
    }
}
