//! Scripted in-memory [`DatasetApi`] for unit tests.

use crate::dataset::DatasetApi;
use crate::error::Result;
use crate::types::SnapshotStatus;
use crate::Error;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Replays queued answers; once the status queue runs dry the last status repeats.
pub(crate) struct ScriptedApi {
    trigger: Mutex<Option<Result<Option<String>>>>,
    statuses: Mutex<VecDeque<Result<SnapshotStatus>>>,
    last_status: Mutex<SnapshotStatus>,
    fetch: Mutex<Option<Result<Value>>>,
    payloads: Mutex<Vec<Vec<Value>>>,
    trigger_calls: AtomicU32,
    status_calls: AtomicU32,
    fetch_calls: AtomicU32,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self {
            trigger: Mutex::new(Some(Ok(Some("snap123".to_string())))),
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(SnapshotStatus::Running),
            fetch: Mutex::new(None),
            payloads: Mutex::new(Vec::new()),
            trigger_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
        }
    }

    pub(crate) fn trigger_returns(self, snapshot_id: Option<&str>) -> Self {
        *self.trigger.lock().unwrap() = Some(Ok(snapshot_id.map(str::to_string)));
        self
    }

    pub(crate) fn trigger_err(self, err: Error) -> Self {
        *self.trigger.lock().unwrap() = Some(Err(err));
        self
    }

    pub(crate) fn statuses<I: IntoIterator<Item = SnapshotStatus>>(self, statuses: I) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .extend(statuses.into_iter().map(Ok));
        self
    }

    pub(crate) fn status_err(self, err: Error) -> Self {
        self.statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub(crate) fn fetch_ok(self, data: Value) -> Self {
        *self.fetch.lock().unwrap() = Some(Ok(data));
        self
    }

    pub(crate) fn fetch_err(self, err: Error) -> Self {
        *self.fetch.lock().unwrap() = Some(Err(err));
        self
    }

    pub(crate) fn trigger_calls(&self) -> u32 {
        self.trigger_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn payloads(&self) -> Vec<Vec<Value>> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DatasetApi for ScriptedApi {
    async fn trigger(
        &self,
        payload: &[Value],
        _dataset_id: &str,
        _include_errors: bool,
    ) -> Result<Option<String>> {
        self.trigger_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.to_vec());
        self.trigger
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(Some("snap123".to_string())))
    }

    async fn get_status(&self, _snapshot_id: &str) -> Result<SnapshotStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(Ok(status)) => {
                *self.last_status.lock().unwrap() = status.clone();
                Ok(status)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last_status.lock().unwrap().clone()),
        }
    }

    async fn fetch_result(&self, _snapshot_id: &str) -> Result<Value> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(Value::Array(Vec::new())))
    }
}
