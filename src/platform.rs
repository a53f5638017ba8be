//! Per-platform dataset configuration.
//!
//! Each scraper operation is described by a static [`PlatformConfig`]; the
//! generic workflow is parameterized by it instead of by subclassing.

use crate::dataset::DatasetApi;
use crate::error::Result;
use crate::workflow::WorkflowExecutor;
use serde_json::Value;
use std::time::Duration;

/// Plain function reshaping raw records for one platform.
pub type NormalizeFn = fn(Value) -> Result<Value>;

/// Dataset parameters for one platform operation.
#[derive(Debug, Clone, Copy)]
pub struct PlatformConfig {
    /// Platform name, e.g. `amazon`.
    pub platform: &'static str,
    /// Operation name, e.g. `products`.
    pub operation: &'static str,
    /// Bright Data dataset identifier.
    pub dataset_id: &'static str,
    /// Shortest polling deadline that makes sense for this dataset.
    pub min_poll_timeout: Duration,
    /// Approximate USD cost of one record.
    pub cost_per_record: f64,
    /// Record normalizer.
    pub normalize: NormalizeFn,
}

impl PlatformConfig {
    /// Registry key, `platform.operation`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.platform, self.operation)
    }

    /// Workflow executor labelled for this platform.
    pub fn executor<A: DatasetApi>(&self, api: A) -> WorkflowExecutor<A> {
        WorkflowExecutor::new(api)
            .platform(self.platform)
            .cost_per_record(self.cost_per_record)
    }

    /// Estimated USD cost of collecting `records` records.
    pub fn estimate_cost(&self, records: usize) -> f64 {
        records as f64 * self.cost_per_record
    }
}

/// Identity normalizer.
pub fn passthrough(data: Value) -> Result<Value> {
    Ok(data)
}

/// ChatGPT records carry the reply under `answer_text`; expose it as `answer`.
pub fn normalize_chatgpt(data: Value) -> Result<Value> {
    fn one(mut record: Value) -> Value {
        if let Value::Object(map) = &mut record {
            if !map.contains_key("answer") {
                if let Some(text) = map.get("answer_text").cloned() {
                    map.insert("answer".to_string(), text);
                }
            }
        }
        record
    }

    Ok(match data {
        Value::Array(records) => Value::Array(records.into_iter().map(one).collect()),
        other => one(other),
    })
}

pub const AMAZON_PRODUCTS: PlatformConfig = PlatformConfig {
    platform: "amazon",
    operation: "products",
    dataset_id: "gd_l7q7dkf244hwxbl93",
    min_poll_timeout: Duration::from_secs(240),
    cost_per_record: 0.001,
    normalize: passthrough,
};

pub const AMAZON_REVIEWS: PlatformConfig = PlatformConfig {
    platform: "amazon",
    operation: "reviews",
    dataset_id: "gd_l1vq6tkpl34p7mq7c",
    min_poll_timeout: Duration::from_secs(240),
    cost_per_record: 0.001,
    normalize: passthrough,
};

pub const AMAZON_SELLERS: PlatformConfig = PlatformConfig {
    platform: "amazon",
    operation: "sellers",
    dataset_id: "gd_lwjkkolem8c4o7j3s",
    min_poll_timeout: Duration::from_secs(240),
    cost_per_record: 0.001,
    normalize: passthrough,
};

pub const LINKEDIN_PROFILES: PlatformConfig = PlatformConfig {
    platform: "linkedin",
    operation: "profiles",
    dataset_id: "gd_l1viktl72bvl7bjuj0",
    min_poll_timeout: Duration::from_secs(180),
    cost_per_record: 0.002,
    normalize: passthrough,
};

pub const LINKEDIN_COMPANIES: PlatformConfig = PlatformConfig {
    platform: "linkedin",
    operation: "companies",
    dataset_id: "gd_l1vikfnt1wgvvqz95w",
    min_poll_timeout: Duration::from_secs(180),
    cost_per_record: 0.002,
    normalize: passthrough,
};

pub const LINKEDIN_JOBS: PlatformConfig = PlatformConfig {
    platform: "linkedin",
    operation: "jobs",
    dataset_id: "gd_lpfll7v5hcqtkxl6l",
    min_poll_timeout: Duration::from_secs(180),
    cost_per_record: 0.002,
    normalize: passthrough,
};

pub const LINKEDIN_POSTS: PlatformConfig = PlatformConfig {
    platform: "linkedin",
    operation: "posts",
    dataset_id: "gd_lyy3tktm25m4avu764",
    min_poll_timeout: Duration::from_secs(180),
    cost_per_record: 0.002,
    normalize: passthrough,
};

pub const CHATGPT_PROMPTS: PlatformConfig = PlatformConfig {
    platform: "chatgpt",
    operation: "prompts",
    dataset_id: "gd_m7aof0k82r803d5bjm",
    min_poll_timeout: Duration::from_secs(120),
    cost_per_record: 0.005,
    normalize: normalize_chatgpt,
};

/// Every known operation.
pub const REGISTRY: &[PlatformConfig] = &[
    AMAZON_PRODUCTS,
    AMAZON_REVIEWS,
    AMAZON_SELLERS,
    LINKEDIN_PROFILES,
    LINKEDIN_COMPANIES,
    LINKEDIN_JOBS,
    LINKEDIN_POSTS,
    CHATGPT_PROMPTS,
];

/// Find an operation by its `platform.operation` key.
pub fn lookup(key: &str) -> Option<&'static PlatformConfig> {
    let (platform, operation) = key.split_once('.')?;
    REGISTRY
        .iter()
        .find(|c| c.platform == platform && c.operation == operation)
}
