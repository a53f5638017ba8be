//! Fixed-interval polling of a snapshot until the provider finishes it.
//!
//! The loop suspends on `tokio::time::sleep` between checks, so dropping the
//! returned future (for example through `tokio::time::timeout`) stops it at
//! once. Nothing but the snapshot id is held across a suspend.

use crate::dataset::DatasetApi;
use crate::types::{CollectionMethod, ResultStatus, ScrapeResult, SnapshotStatus};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

/// Default pause between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default overall polling deadline.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Smallest pause the loop will take between checks.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Deadline used when the requested timeout does not fit in an `Instant`.
const UNBOUNDED_POLL_TIMEOUT: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Metadata copied onto every result the poller produces.
#[derive(Debug, Clone)]
pub struct PollContext {
    /// When the trigger request was sent.
    pub trigger_sent_at: DateTime<Utc>,
    /// When the snapshot id came back.
    pub snapshot_id_received_at: DateTime<Utc>,
    /// Platform name for the result record.
    pub platform: Option<String>,
    /// Estimated USD cost of one fetched record.
    pub cost_per_record: f64,
}

impl PollContext {
    fn stamp(&self, mut result: ScrapeResult, snapshot_id: &str, polls: u32) -> ScrapeResult {
        result.platform = self.platform.clone();
        result.snapshot_id = Some(snapshot_id.to_string());
        result.snapshot_id_received_at = Some(self.snapshot_id_received_at);
        result.poll_count = polls;
        result
    }

    fn failure(&self, status: ResultStatus, error: String) -> ScrapeResult {
        ScrapeResult::failed(
            status,
            error,
            CollectionMethod::WebScraper,
            self.trigger_sent_at,
        )
    }
}

/// Poll `snapshot_id` every `poll_interval` until it is `ready` or `failed`,
/// or until `poll_timeout` has passed.
///
/// A `ready` snapshot is fetched and returned as a successful result. A
/// `failed` snapshot, a failed request, or an expired deadline each produce a
/// failed result; this function never returns an error.
pub async fn poll_until_ready<A>(
    api: &A,
    snapshot_id: &str,
    poll_interval: Duration,
    poll_timeout: Duration,
    ctx: &PollContext,
) -> ScrapeResult
where
    A: DatasetApi + ?Sized,
{
    let started = Instant::now();
    let deadline = started
        .checked_add(poll_timeout)
        .unwrap_or_else(|| started + UNBOUNDED_POLL_TIMEOUT);
    let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
    let mut polls = 0u32;

    loop {
        polls += 1;
        let status = match api.get_status(snapshot_id).await {
            Ok(status) => status,
            Err(e) => {
                warn!(snapshot_id = snapshot_id, error = %e, "Status check failed");
                let result = ctx.failure(ResultStatus::Error, format!("Status check failed: {}", e));
                return ctx.stamp(result, snapshot_id, polls);
            }
        };

        debug!(
            snapshot_id = snapshot_id,
            status = %status,
            poll = polls,
            "Snapshot status"
        );

        match status {
            SnapshotStatus::Ready => {
                let result = fetch_ready(api, snapshot_id, ctx).await;
                return ctx.stamp(result, snapshot_id, polls);
            }
            SnapshotStatus::Failed => {
                warn!(snapshot_id = snapshot_id, "Provider reported the job as failed");
                let result = ctx.failure(
                    ResultStatus::Error,
                    format!("Job failed on the provider side (snapshot {})", snapshot_id),
                );
                return ctx.stamp(result, snapshot_id, polls);
            }
            SnapshotStatus::Running | SnapshotStatus::Other(_) => {}
        }

        let now = Instant::now();
        if now >= deadline {
            let elapsed = now.duration_since(started).as_secs();
            warn!(
                snapshot_id = snapshot_id,
                elapsed_secs = elapsed,
                polls = polls,
                "Polling deadline reached"
            );
            let mut result = ctx.failure(
                ResultStatus::Timeout,
                format!(
                    "Polling timeout after {}s (snapshot {})",
                    poll_timeout.as_secs(),
                    snapshot_id
                ),
            );
            result.elapsed_secs = Some(elapsed);
            return ctx.stamp(result, snapshot_id, polls);
        }

        // The last pause is cut short so the final check lands on the deadline
        sleep(poll_interval.min(deadline - now)).await;
    }
}

async fn fetch_ready<A>(api: &A, snapshot_id: &str, ctx: &PollContext) -> ScrapeResult
where
    A: DatasetApi + ?Sized,
{
    match api.fetch_result(snapshot_id).await {
        Ok(data) => {
            let rows = match &data {
                Value::Array(items) => items.len(),
                Value::Null => 0,
                _ => 1,
            };
            debug!(snapshot_id = snapshot_id, rows = rows, "Fetched snapshot data");

            let mut result =
                ScrapeResult::succeeded(data, CollectionMethod::WebScraper, ctx.trigger_sent_at);
            result.data_fetched_at = Some(Utc::now());
            result.row_count = Some(rows);
            result.cost = Some(rows as f64 * ctx.cost_per_record);
            result
        }
        Err(e) => {
            warn!(snapshot_id = snapshot_id, error = %e, "Fetching snapshot data failed");
            ctx.failure(ResultStatus::Error, format!("Failed to fetch results: {}", e))
        }
    }
}
