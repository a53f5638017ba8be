//! Trigger, poll, fetch and normalize as one operation.

use crate::dataset::DatasetApi;
use crate::error::{Error, Result};
use crate::poller::{poll_until_ready, PollContext};
use crate::types::{CollectionMethod, ResultStatus, ScrapeResult, Targets};
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Default estimated USD cost of one record.
pub const DEFAULT_COST_PER_RECORD: f64 = 0.001;

/// Reshapes raw provider records into a stable per-platform shape.
pub type Normalizer = dyn Fn(Value) -> Result<Value> + Send + Sync;

/// Runs the trigger/poll/fetch workflow against a [`DatasetApi`].
///
/// Request failures during any step come back as a failed [`ScrapeResult`];
/// only normalization errors and malformed snapshot ids are returned as `Err`.
#[derive(Debug, Clone)]
pub struct WorkflowExecutor<A> {
    api: A,
    platform: Option<String>,
    cost_per_record: f64,
}

impl<A: DatasetApi> WorkflowExecutor<A> {
    /// Create an executor with no platform label.
    pub fn new(api: A) -> Self {
        Self {
            api,
            platform: None,
            cost_per_record: DEFAULT_COST_PER_RECORD,
        }
    }

    /// Set the platform name copied onto results.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the estimated cost of one record.
    pub fn cost_per_record(mut self, cost: f64) -> Self {
        self.cost_per_record = cost;
        self
    }

    /// The underlying dataset API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Trigger a job for `payload`, wait for it and fetch its output.
    ///
    /// Exactly one terminal result is produced per call: `ready` with data,
    /// `error` with a description, or `timeout`.
    pub async fn execute(
        &self,
        payload: &[Value],
        dataset_id: &str,
        poll_interval: Duration,
        poll_timeout: Duration,
        include_errors: bool,
        normalize: Option<&Normalizer>,
    ) -> Result<ScrapeResult> {
        let trigger_sent_at = Utc::now();
        info!(
            dataset_id = dataset_id,
            items = payload.len(),
            platform = self.platform.as_deref().unwrap_or("-"),
            "Triggering collection"
        );

        let snapshot_id = match self.api.trigger(payload, dataset_id, include_errors).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!(dataset_id = dataset_id, "Trigger returned no snapshot id");
                return Ok(self.trigger_failure(
                    "Failed to trigger scrape - no snapshot_id returned".to_string(),
                    trigger_sent_at,
                ));
            }
            Err(e) => {
                warn!(dataset_id = dataset_id, error = %e, "Trigger failed");
                return Ok(self.trigger_failure(format!("Trigger failed: {}", e), trigger_sent_at));
            }
        };

        if !is_well_formed(&snapshot_id) {
            warn!(dataset_id = dataset_id, snapshot_id = %snapshot_id, "Refusing malformed snapshot id");
            return Err(Error::MalformedResponse(format!(
                "snapshot id {:?} contains characters outside [A-Za-z0-9_-]",
                snapshot_id
            )));
        }

        let ctx = PollContext {
            trigger_sent_at,
            snapshot_id_received_at: Utc::now(),
            platform: self.platform.clone(),
            cost_per_record: self.cost_per_record,
        };
        info!(snapshot_id = %snapshot_id, "Snapshot accepted, polling");

        let mut result =
            poll_until_ready(&self.api, &snapshot_id, poll_interval, poll_timeout, &ctx).await;

        if result.success {
            if let Some(normalize) = normalize {
                if let Some(data) = result.data.take() {
                    result.data = Some(normalize(data)?);
                }
            }
            info!(
                snapshot_id = %snapshot_id,
                rows = result.row_count.unwrap_or(0),
                "Collection finished"
            );
        }

        Ok(result)
    }

    fn trigger_failure(
        &self,
        error: String,
        trigger_sent_at: chrono::DateTime<Utc>,
    ) -> ScrapeResult {
        let mut result = ScrapeResult::failed(
            ResultStatus::Error,
            error,
            CollectionMethod::WebScraper,
            trigger_sent_at,
        );
        result.platform = self.platform.clone();
        result
    }
}

/// Snapshot ids end up in URL paths; anything outside this alphabet is refused.
fn is_well_formed(snapshot_id: &str) -> bool {
    snapshot_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Unwrap a one-element list when exactly one input was submitted.
///
/// The result's `url` is set to that input. Lists of any other length, and
/// every batch result, are left untouched; an empty list stays an empty list.
pub fn collapse_single(mut result: ScrapeResult, targets: &Targets) -> ScrapeResult {
    let Targets::One(input) = targets else {
        return result;
    };

    if unwrap_single(&mut result) {
        result.url = Some(input.clone());
    }
    result
}

/// Unwrap a one-element list in place for inputs that are not URLs.
///
/// Returns whether anything was unwrapped. `url` is not touched.
pub(crate) fn unwrap_single(result: &mut ScrapeResult) -> bool {
    let single = match &mut result.data {
        Some(Value::Array(items)) if items.len() == 1 => items.pop(),
        _ => None,
    };

    match single {
        Some(item) => {
            result.data = Some(item);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedApi;
    use crate::types::SnapshotStatus;
    use serde_json::json;

    const INTERVAL: Duration = Duration::from_secs(10);
    const TIMEOUT: Duration = Duration::from_secs(240);

    fn executor(api: ScriptedApi) -> WorkflowExecutor<ScriptedApi> {
        WorkflowExecutor::new(api).platform("amazon").cost_per_record(0.001)
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_url_scenario() {
        let url = "https://www.amazon.com/dp/B0CRMZHDG8";
        let targets = Targets::from(url);
        let workflow = executor(
            ScriptedApi::new()
                .trigger_returns(Some("snap123"))
                .statuses([SnapshotStatus::Running, SnapshotStatus::Running, SnapshotStatus::Ready])
                .fetch_ok(json!([{"title": "x"}])),
        );

        let payload = vec![json!({"url": url})];
        let result = workflow
            .execute(&payload, "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap();
        let result = collapse_single(result, &targets);

        assert!(result.success);
        assert_eq!(result.status, ResultStatus::Ready);
        assert_eq!(result.data, Some(json!({"title": "x"})));
        assert_eq!(result.url.as_deref(), Some(url));
        assert_eq!(result.snapshot_id.as_deref(), Some("snap123"));
        assert_eq!(result.platform.as_deref(), Some("amazon"));
        assert!(result.error.is_none());

        let received = result.snapshot_id_received_at.unwrap();
        let fetched = result.data_fetched_at.unwrap();
        assert!(result.trigger_sent_at <= received);
        assert!(received <= fetched);
        assert_eq!(workflow.api().status_calls(), 3);
        assert_eq!(workflow.api().payloads(), vec![payload]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_api_error_skips_polling() {
        let workflow = executor(
            ScriptedApi::new().trigger_err(Error::from_status(500, "Internal error".into())),
        );

        let result = workflow
            .execute(&[json!({"url": "https://a.com"})], "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.status, ResultStatus::Error);
        let error = result.error.unwrap();
        assert!(error.contains("Trigger failed"));
        assert!(error.contains("500"));
        assert!(result.snapshot_id_received_at.is_none());
        assert_eq!(workflow.api().trigger_calls(), 1);
        assert_eq!(workflow.api().status_calls(), 0);
        assert_eq!(workflow.api().fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_auth_error_is_reported() {
        let workflow = executor(
            ScriptedApi::new().trigger_err(Error::Authentication("Invalid token".into())),
        );

        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap();

        assert_eq!(result.status, ResultStatus::Error);
        assert!(result.error.unwrap().contains("Authentication failed"));
        assert_eq!(workflow.api().status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_snapshot_id_is_trigger_failure() {
        let workflow = executor(ScriptedApi::new().trigger_returns(None));

        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.status, ResultStatus::Error);
        assert!(result.error.unwrap().contains("no snapshot_id"));
        assert_eq!(workflow.api().status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_snapshot_id_is_an_error() {
        let workflow = executor(ScriptedApi::new().trigger_returns(Some("../../etc")));

        let err = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::MalformedResponse(ref msg) if msg.contains("../../etc")));
        assert_eq!(workflow.api().status_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_stops_after_one_check() {
        let workflow = executor(ScriptedApi::new().statuses([SnapshotStatus::Failed]));

        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, None)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.status, ResultStatus::Error);
        assert_eq!(workflow.api().status_calls(), 1);
        assert_eq!(workflow.api().fetch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_result_not_an_error() {
        let workflow = executor(ScriptedApi::new().statuses([SnapshotStatus::Running]));

        let started = tokio::time::Instant::now();
        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, Duration::from_secs(60), true, None)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.status, ResultStatus::Timeout);
        assert!(result.error.unwrap().contains("timeout"));
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(60) && waited <= Duration::from_secs(70));
    }

    #[tokio::test(start_paused = true)]
    async fn test_normalizer_replaces_data() {
        let workflow = executor(
            ScriptedApi::new()
                .statuses([SnapshotStatus::Ready])
                .fetch_ok(json!([{"title": "a"}, {"title": "b"}])),
        );
        let upper: &Normalizer = &|data: Value| {
            let items = data.as_array().cloned().unwrap_or_default();
            Ok(Value::Array(
                items
                    .into_iter()
                    .map(|item| json!({"name": item["title"].as_str().unwrap_or("").to_uppercase()}))
                    .collect(),
            ))
        };

        let result = workflow
            .execute(&[json!({}), json!({})], "gd_test", INTERVAL, TIMEOUT, true, Some(upper))
            .await
            .unwrap();

        assert_eq!(result.data, Some(json!([{"name": "A"}, {"name": "B"}])));
    }

    #[tokio::test(start_paused = true)]
    async fn test_identity_normalizer_is_noop() {
        let raw = json!([{"title": "x", "price": 10}]);
        let workflow =
            executor(ScriptedApi::new().statuses([SnapshotStatus::Ready]).fetch_ok(raw.clone()));
        let identity: &Normalizer = &|data: Value| Ok(data);

        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, Some(identity))
            .await
            .unwrap();

        assert_eq!(result.data, Some(raw));
    }

    #[tokio::test(start_paused = true)]
    async fn test_normalizer_error_propagates() {
        let workflow = executor(
            ScriptedApi::new()
                .statuses([SnapshotStatus::Ready])
                .fetch_ok(json!([1])),
        );
        let broken: &Normalizer = &|_: Value| Err(Error::Normalization("bad shape".into()));

        let err = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, Some(broken))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Normalization(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_normalizer_skipped_on_failure() {
        let workflow = executor(ScriptedApi::new().statuses([SnapshotStatus::Failed]));
        let broken: &Normalizer = &|_: Value| Err(Error::Normalization("unreachable".into()));

        let result = workflow
            .execute(&[json!({})], "gd_test", INTERVAL, TIMEOUT, true, Some(broken))
            .await
            .unwrap();

        assert!(!result.success);
    }

    #[test]
    fn test_batch_keeps_list_order() {
        let targets = Targets::from(vec!["https://a.com", "https://b.com", "https://c.com"]);
        let result = ScrapeResult::succeeded(
            json!([{"id": 1}, {"id": 2}]),
            CollectionMethod::WebScraper,
            Utc::now(),
        );

        let result = collapse_single(result, &targets);

        assert_eq!(result.data, Some(json!([{"id": 1}, {"id": 2}])));
        assert!(result.url.is_none());
    }

    #[test]
    fn test_single_input_empty_list_stays_empty() {
        let targets = Targets::from("https://a.com");
        let result = ScrapeResult::succeeded(json!([]), CollectionMethod::WebScraper, Utc::now());

        let result = collapse_single(result, &targets);

        assert_eq!(result.data, Some(json!([])));
        assert!(result.url.is_none());
    }

    #[test]
    fn test_single_input_many_records_not_collapsed() {
        let targets = Targets::from("https://a.com");
        let result = ScrapeResult::succeeded(
            json!([{"review": 1}, {"review": 2}]),
            CollectionMethod::WebScraper,
            Utc::now(),
        );

        let result = collapse_single(result, &targets);

        assert_eq!(result.records().len(), 2);
    }

    #[test]
    fn test_unwrap_single_leaves_url_unset() {
        let mut result =
            ScrapeResult::succeeded(json!([{"answer": "hi"}]), CollectionMethod::WebScraper, Utc::now());

        assert!(unwrap_single(&mut result));
        assert_eq!(result.data, Some(json!({"answer": "hi"})));
        assert!(result.url.is_none());

        let mut many =
            ScrapeResult::succeeded(json!([{"a": 1}, {"a": 2}]), CollectionMethod::WebScraper, Utc::now());
        assert!(!unwrap_single(&mut many));
    }
}
