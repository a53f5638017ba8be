//! API types for the Bright Data SDK.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Provider-side state of a snapshot, as reported by the progress endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// Collection still in progress.
    Running,
    /// Results are ready to be fetched.
    Ready,
    /// The provider gave up on the job.
    Failed,
    /// Any other state string; treated as still in progress.
    Other(String),
}

impl SnapshotStatus {
    /// Whether polling can stop at this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SnapshotStatus::Ready | SnapshotStatus::Failed)
    }

    /// The state as the provider spells it.
    pub fn as_str(&self) -> &str {
        match self {
            SnapshotStatus::Running => "running",
            SnapshotStatus::Ready => "ready",
            SnapshotStatus::Failed => "failed",
            SnapshotStatus::Other(s) => s,
        }
    }
}

impl From<&str> for SnapshotStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" => SnapshotStatus::Running,
            "ready" => SnapshotStatus::Ready,
            "failed" => SnapshotStatus::Failed,
            _ => SnapshotStatus::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a workflow execution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    /// Data was fetched after a `ready` status.
    Ready,
    /// A request failed or the provider reported the job as failed.
    Error,
    /// The polling deadline passed before the job finished.
    Timeout,
}

/// Which Bright Data product produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollectionMethod {
    /// Datasets API trigger/poll/fetch.
    WebScraper,
    /// Web Unlocker proxy request.
    WebUnlocker,
    /// SERP API request.
    Serp,
}

/// Uniform result of a scrape, search or unlocker call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// True only if data was fetched.
    pub success: bool,
    /// Terminal status.
    pub status: ResultStatus,
    /// The input URL, set when a single-input call was collapsed to one record.
    pub url: Option<String>,
    /// Fetched (and normalized) payload.
    pub data: Option<Value>,
    /// Failure description, present only when `success` is false.
    pub error: Option<String>,
    /// Platform the call was made for.
    pub platform: Option<String>,
    /// Product used for the collection.
    pub method: CollectionMethod,
    /// Provider snapshot handle.
    pub snapshot_id: Option<String>,
    /// Number of records fetched.
    pub row_count: Option<usize>,
    /// Estimated cost in USD.
    pub cost: Option<f64>,
    /// Number of status checks made.
    pub poll_count: u32,
    /// Seconds spent polling, recorded on timeout.
    pub elapsed_secs: Option<u64>,
    /// When the trigger request was sent.
    pub trigger_sent_at: DateTime<Utc>,
    /// When the snapshot id came back.
    pub snapshot_id_received_at: Option<DateTime<Utc>>,
    /// When the data (or the failure) was recorded.
    pub data_fetched_at: Option<DateTime<Utc>>,
}

impl ScrapeResult {
    /// A successful result holding `data`.
    pub(crate) fn succeeded(
        data: Value,
        method: CollectionMethod,
        trigger_sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            data: Some(data),
            ..Self::blank(true, ResultStatus::Ready, method, trigger_sent_at)
        }
    }

    /// A failed result; `data_fetched_at` is stamped now.
    pub(crate) fn failed(
        status: ResultStatus,
        error: impl Into<String>,
        method: CollectionMethod,
        trigger_sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            data_fetched_at: Some(Utc::now()),
            ..Self::blank(false, status, method, trigger_sent_at)
        }
    }

    fn blank(
        success: bool,
        status: ResultStatus,
        method: CollectionMethod,
        trigger_sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            success,
            status,
            url: None,
            data: None,
            error: None,
            platform: None,
            method,
            snapshot_id: None,
            row_count: None,
            cost: None,
            poll_count: 0,
            elapsed_secs: None,
            trigger_sent_at,
            snapshot_id_received_at: None,
            data_fetched_at: None,
        }
    }

    /// Time from sending the trigger until the snapshot id arrived.
    pub fn trigger_latency(&self) -> Option<Duration> {
        self.snapshot_id_received_at
            .map(|received| received - self.trigger_sent_at)
    }

    /// Time from sending the trigger until the data arrived.
    pub fn total_duration(&self) -> Option<Duration> {
        self.data_fetched_at
            .map(|fetched| fetched - self.trigger_sent_at)
    }

    /// The fetched records as a list, whether `data` holds one record or many.
    pub fn records(&self) -> Vec<&Value> {
        match &self.data {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        }
    }
}

/// One input or many, submitted together as one job.
///
/// A single input yields a single record where possible; many inputs always
/// yield a list in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// A single input.
    One(String),
    /// A batch of inputs.
    Many(Vec<String>),
}

impl Targets {
    /// Whether this was given as a single input.
    pub fn is_single(&self) -> bool {
        matches!(self, Targets::One(_))
    }

    /// Number of inputs.
    pub fn len(&self) -> usize {
        match self {
            Targets::One(_) => 1,
            Targets::Many(items) => items.len(),
        }
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inputs in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            Targets::One(item) => std::slice::from_ref(item),
            Targets::Many(items) => items,
        };
        items.iter().map(String::as_str)
    }
}

impl From<&str> for Targets {
    fn from(value: &str) -> Self {
        Targets::One(value.to_string())
    }
}

impl From<String> for Targets {
    fn from(value: String) -> Self {
        Targets::One(value)
    }
}

impl From<&String> for Targets {
    fn from(value: &String) -> Self {
        Targets::One(value.clone())
    }
}

impl From<Vec<String>> for Targets {
    fn from(value: Vec<String>) -> Self {
        Targets::Many(value)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(value: Vec<&str>) -> Self {
        Targets::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Targets {
    fn from(value: &[&str]) -> Self {
        Targets::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(value: [&str; N]) -> Self {
        Targets::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

/// An active zone on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Zone name.
    pub name: String,
    /// Zone product type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    /// Remaining zone fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Account overview derived from the zone list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Active zones.
    pub zones: Vec<Zone>,
    /// Number of active zones.
    pub zone_count: usize,
    /// Whether the token was accepted.
    pub authenticated: bool,
}
