//! Blocking wrapper around the async [`Client`](crate::Client).
//!
//! Runs each call to completion on a private current-thread runtime. Do not
//! use from inside another tokio runtime.
//!
//! ```rust,no_run
//! let client = brightdata::blocking::Client::from_env()?;
//! let result = client.call(|c| async move {
//!     c.scrape().amazon().products("https://www.amazon.com/dp/B0CRMZHDG8").await
//! })?;
//! println!("{:?}", result.status);
//! # Ok::<(), brightdata::Error>(())
//! ```

use crate::error::{Error, Result};
use crate::types::Zone;
use std::future::Future;
use tokio::runtime::{Builder, Runtime};

/// Synchronous Bright Data client.
#[derive(Debug)]
pub struct Client {
    inner: crate::Client,
    runtime: Runtime,
}

impl Client {
    /// Wrap an async client.
    pub fn new(inner: crate::Client) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("Failed to start runtime: {}", e)))?;
        Ok(Self { inner, runtime })
    }

    /// Build from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(crate::Client::from_env()?)
    }

    /// The wrapped async client.
    pub fn inner(&self) -> &crate::Client {
        &self.inner
    }

    /// Run any async operation of the client and wait for it.
    pub fn call<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce(crate::Client) -> Fut,
        Fut: Future<Output = T>,
    {
        self.runtime.block_on(op(self.inner.clone()))
    }

    /// See [`crate::Client::test_connection`].
    pub fn test_connection(&self) -> Result<bool> {
        self.runtime.block_on(self.inner.test_connection())
    }

    /// See [`crate::Client::list_zones`].
    pub fn list_zones(&self) -> Result<Vec<Zone>> {
        self.runtime.block_on(self.inner.list_zones())
    }
}
