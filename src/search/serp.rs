//! Search engine result pages through the SERP zone.

use crate::error::{Error, Result};
use serde_json::{json, Value};
use url::Url;

/// Supported search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    /// google.com
    Google,
    /// bing.com
    Bing,
    /// yandex.com
    Yandex,
}

impl SearchEngine {
    /// Lowercase engine name, used as the result's platform.
    pub fn name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::Yandex => "yandex",
        }
    }

    fn default_language(&self) -> &'static str {
        match self {
            SearchEngine::Yandex => "ru",
            _ => "en",
        }
    }

    /// The engine's search URL for `query`, asking for parsed JSON output.
    pub fn search_url(&self, query: &str, options: &SerpOptions) -> Result<String> {
        let language = options
            .language
            .as_deref()
            .unwrap_or_else(|| self.default_language());
        let num = options.num_results.to_string();

        let mut params: Vec<(&str, &str)> = match self {
            SearchEngine::Google => vec![("q", query), ("num", num.as_str()), ("hl", language)],
            SearchEngine::Bing => vec![("q", query), ("count", num.as_str()), ("setlang", language)],
            SearchEngine::Yandex => vec![("text", query), ("numdoc", num.as_str()), ("lang", language)],
        };

        if let Some(country) = options.country.as_deref() {
            params.push(match self {
                SearchEngine::Google => ("gl", country),
                SearchEngine::Bing => ("cc", country),
                SearchEngine::Yandex => ("lr", country),
            });
        }
        if options.device == Device::Mobile {
            params.push(("brd_mobile", "1"));
        }
        params.push(("brd_json", "1"));

        let base = match self {
            SearchEngine::Google => "https://www.google.com/search",
            SearchEngine::Bing => "https://www.bing.com/search",
            SearchEngine::Yandex => "https://yandex.com/search/",
        };

        Url::parse_with_params(base, &params)
            .map(String::from)
            .map_err(|e| Error::Validation(format!("Cannot build search URL: {}", e)))
    }
}

/// Device the results are rendered for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Device {
    /// Desktop results.
    #[default]
    Desktop,
    /// Mobile results.
    Mobile,
}

/// Search parameters shared by all engines.
#[derive(Debug, Clone)]
pub struct SerpOptions {
    /// Two-letter country to search from.
    pub country: Option<String>,
    /// Interface language; the engine default when unset.
    pub language: Option<String>,
    /// Device type.
    pub device: Device,
    /// Number of results to request.
    pub num_results: u32,
    /// Zone to route through; the client's SERP zone when unset.
    pub zone: Option<String>,
}

impl Default for SerpOptions {
    fn default() -> Self {
        Self {
            country: None,
            language: None,
            device: Device::Desktop,
            num_results: 10,
            zone: None,
        }
    }
}

impl SerpOptions {
    /// Set the country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Set the language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Set the number of results.
    pub fn num_results(mut self, n: u32) -> Self {
        self.num_results = n;
        self
    }
}

/// Flatten parsed SERP output into ranked `{position, title, url, description}` rows.
///
/// Data without an `organic` list is returned unchanged, so applying this to
/// its own output is a no-op.
pub fn normalize_serp(data: Value) -> Result<Value> {
    let Some(organic) = data.get("organic").and_then(Value::as_array) else {
        return Ok(data);
    };

    let results: Vec<Value> = organic
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let position = item
                .get("rank")
                .and_then(Value::as_u64)
                .unwrap_or(i as u64 + 1);
            json!({
                "position": position,
                "title": item.get("title").cloned().unwrap_or(Value::Null),
                "url": item.get("link").or_else(|| item.get("url")).cloned().unwrap_or(Value::Null),
                "description": item.get("description").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    Ok(json!({
        "results": results,
        "total_found": results.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_url() {
        let options = SerpOptions::default().country("us").num_results(20);
        let url = SearchEngine::Google.search_url("rust async", &options).unwrap();
        assert_eq!(
            url,
            "https://www.google.com/search?q=rust+async&num=20&hl=en&gl=us&brd_json=1"
        );
    }

    #[test]
    fn test_yandex_defaults_to_russian() {
        let url = SearchEngine::Yandex
            .search_url("погода", &SerpOptions::default())
            .unwrap();
        assert!(url.starts_with("https://yandex.com/search/?text="));
        assert!(url.contains("lang=ru"));
    }

    #[test]
    fn test_mobile_flag() {
        let options = SerpOptions::default().device(Device::Mobile);
        let url = SearchEngine::Bing.search_url("q", &options).unwrap();
        assert!(url.contains("brd_mobile=1"));
        assert!(url.contains("count=10"));
    }

    #[test]
    fn test_normalize_serp() {
        let raw = json!({
            "general": {"query": "rust"},
            "organic": [
                {"rank": 1, "title": "Rust", "link": "https://www.rust-lang.org/", "description": "A language"},
                {"title": "Docs", "link": "https://doc.rust-lang.org/"}
            ]
        });

        let normalized = normalize_serp(raw).unwrap();
        assert_eq!(normalized["total_found"], 2);
        assert_eq!(normalized["results"][0]["url"], "https://www.rust-lang.org/");
        assert_eq!(normalized["results"][1]["position"], 2);
        assert_eq!(normalized["results"][1]["description"], Value::Null);

        assert_eq!(normalize_serp(normalized.clone()).unwrap(), normalized);
    }
}
