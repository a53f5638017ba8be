//! Main Bright Data client implementation.

use crate::dataset::DatasetClient;
use crate::error::{Error, Result};
use crate::scrapers::ScrapeService;
use crate::search::SearchService;
use crate::transport::Transport;
use crate::types::{AccountInfo, Zone};
use crate::version::build_user_agent;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://api.brightdata.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_UNLOCKER_ZONE: &str = "sdk_unlocker";
const DEFAULT_SERP_ZONE: &str = "sdk_serp";

/// Environment variables checked for the API token, in order.
pub const TOKEN_ENV_VARS: [&str; 4] = [
    "BRIGHTDATA_API_TOKEN",
    "BRIGHTDATA_TOKEN",
    "BRIGHT_DATA_API_TOKEN",
    "BRIGHT_DATA_TOKEN",
];

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV_VAR: &str = "BRIGHTDATA_BASE_URL";

/// Builder for constructing a [`Client`].
#[derive(Clone)]
pub struct ClientBuilder {
    token: String,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    web_unlocker_zone: String,
    serp_zone: String,
    user_agent_suffix: Option<String>,
}

impl ClientBuilder {
    /// Create a new client builder with the given API token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            web_unlocker_zone: DEFAULT_UNLOCKER_ZONE.to_string(),
            serp_zone: DEFAULT_SERP_ZONE.to_string(),
            user_agent_suffix: None,
        }
    }

    /// Create a builder from the environment.
    ///
    /// The token is the first non-empty value of [`TOKEN_ENV_VARS`];
    /// `BRIGHTDATA_BASE_URL` overrides the base URL when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = TOKEN_ENV_VARS
            .iter()
            .filter_map(|key| lookup(*key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "API token not found; set one of {}",
                    TOKEN_ENV_VARS.join(", ")
                ))
            })?;

        let mut builder = Self::new(token);
        if let Some(url) = lookup(BASE_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            builder = builder.base_url(url.trim());
        }
        Ok(builder)
    }

    /// Set the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum retry attempts for network errors.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the zone used by `scrape().url(...)`.
    pub fn web_unlocker_zone(mut self, zone: impl Into<String>) -> Self {
        self.web_unlocker_zone = zone.into();
        self
    }

    /// Set the zone used by search engine requests.
    pub fn serp_zone(mut self, zone: impl Into<String>) -> Self {
        self.serp_zone = zone.into();
        self
    }

    /// Set a custom User-Agent suffix.
    pub fn user_agent_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent_suffix = Some(suffix.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(Error::Config("API token is required".into()));
        }

        if !self.base_url.starts_with("https://") {
            warn!(
                base_url = %self.base_url,
                "API base URL is not using HTTPS. This is insecure."
            );
        }

        let user_agent = build_user_agent(self.user_agent_suffix.as_deref());
        let transport = Transport::new(
            token,
            self.base_url,
            self.timeout,
            self.max_retries,
            &user_agent,
        )?;

        Ok(Client {
            transport: Arc::new(transport),
            web_unlocker_zone: self.web_unlocker_zone,
            serp_zone: self.serp_zone,
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("web_unlocker_zone", &self.web_unlocker_zone)
            .field("serp_zone", &self.serp_zone)
            .finish_non_exhaustive()
    }
}

/// The main Bright Data SDK client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use brightdata::Client;
///
/// #[tokio::main]
/// async fn main() -> Result<(), brightdata::Error> {
///     let client = Client::builder("your-api-token").build()?;
///
///     let result = client
///         .scrape()
///         .amazon()
///         .products("https://www.amazon.com/dp/B0CRMZHDG8")
///         .await?;
///
///     println!("{:?}", result.data);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    transport: Arc<Transport>,
    web_unlocker_zone: String,
    serp_zone: String,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }

    /// Build a client from environment variables with default settings.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_env()?.build()
    }

    /// Platform scrapers and Web Unlocker fetching.
    pub fn scrape(&self) -> ScrapeService {
        ScrapeService::new(self.transport.clone(), self.web_unlocker_zone.clone())
    }

    /// Search engines and discovery.
    pub fn search(&self) -> SearchService {
        SearchService::new(self.transport.clone(), self.serp_zone.clone())
    }

    /// Raw access to the Datasets API, for driving a
    /// [`WorkflowExecutor`](crate::WorkflowExecutor) with any dataset id.
    pub fn datasets(&self) -> DatasetClient {
        DatasetClient::new(self.transport.clone())
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The API token with all but its first and last four characters hidden.
    pub fn masked_token(&self) -> String {
        self.transport.masked_token()
    }

    // === Account ===

    /// List the account's active zones.
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let zones: Option<Vec<Zone>> = self
            .transport
            .get_json("/zone/get_active_zones", &[])
            .await?;
        Ok(zones.unwrap_or_default())
    }

    /// Zones plus whether the token was accepted.
    pub async fn get_account_info(&self) -> Result<AccountInfo> {
        let zones = self.list_zones().await?;
        info!(zone_count = zones.len(), "Fetched account info");
        Ok(AccountInfo {
            zone_count: zones.len(),
            zones,
            authenticated: true,
        })
    }

    /// Check that the token is accepted.
    ///
    /// Returns `Ok(false)` when the API rejects the request; network and
    /// configuration failures are still errors.
    pub async fn test_connection(&self) -> Result<bool> {
        match self.list_zones().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_auth_or_api() => {
                warn!(error = %e, "Connection test failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.transport.base_url())
            .field("token", &self.transport.masked_token())
            .field("web_unlocker_zone", &self.web_unlocker_zone)
            .field("serp_zone", &self.serp_zone)
            .finish()
    }
}
