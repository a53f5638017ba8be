//! Datasets API: trigger a collection, check its progress, fetch its output.

use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::SnapshotStatus;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// The three primitive dataset operations the workflow is built from.
///
/// Each call is a single round trip. Implementations report rejected
/// credentials as [`Error::Authentication`] and every other non-success
/// response as [`Error::Api`].
#[async_trait]
pub trait DatasetApi: Send + Sync {
    /// Submit work items against `dataset_id` and return the snapshot id.
    ///
    /// `Ok(None)` means the provider accepted the request but handed back no
    /// usable identifier.
    async fn trigger(
        &self,
        payload: &[Value],
        dataset_id: &str,
        include_errors: bool,
    ) -> Result<Option<String>>;

    /// Query the provider-side state of a snapshot. Has no side effects.
    async fn get_status(&self, snapshot_id: &str) -> Result<SnapshotStatus>;

    /// Fetch the output of a snapshot that reported `ready`.
    async fn fetch_result(&self, snapshot_id: &str) -> Result<Value>;
}

#[derive(Deserialize)]
struct TriggerResponse {
    snapshot_id: Option<String>,
}

#[derive(Deserialize)]
struct ProgressResponse {
    status: String,
}

/// [`DatasetApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct DatasetClient {
    transport: Arc<Transport>,
}

impl DatasetClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DatasetApi for DatasetClient {
    async fn trigger(
        &self,
        payload: &[Value],
        dataset_id: &str,
        include_errors: bool,
    ) -> Result<Option<String>> {
        let include_errors = if include_errors { "true" } else { "false" };
        let response: TriggerResponse = self
            .transport
            .post_json(
                "/datasets/v3/trigger",
                &[("dataset_id", dataset_id), ("include_errors", include_errors)],
                payload,
            )
            .await?;

        Ok(response.snapshot_id.filter(|id| !id.trim().is_empty()))
    }

    async fn get_status(&self, snapshot_id: &str) -> Result<SnapshotStatus> {
        let path = format!("/datasets/v3/progress/{}", snapshot_id);
        let response: ProgressResponse = self.transport.get_json(&path, &[]).await?;
        Ok(SnapshotStatus::from(response.status.as_str()))
    }

    async fn fetch_result(&self, snapshot_id: &str) -> Result<Value> {
        let path = format!("/datasets/v3/snapshot/{}", snapshot_id);
        let (status, body) = self
            .transport
            .send_checked(Method::GET, &path, &[("format", "json")], None::<&()>)
            .await?;

        serde_json::from_str(&body).map_err(|e| {
            Error::malformed(status, format!("Failed to parse snapshot data: {}", e), body)
        })
    }
}
