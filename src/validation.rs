//! Input checks run before any request is sent.

use crate::error::{Error, Result};
use crate::types::Targets;
use url::Url;

/// Check that `raw` is an absolute `http`/`https` URL with a host.
pub fn validate_url(raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| Error::Validation(format!("Invalid URL {:?}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Validation(format!(
            "Invalid URL {:?}: scheme must be http or https",
            raw
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(Error::Validation(format!(
            "Invalid URL {:?}: missing host",
            raw
        )));
    }

    Ok(())
}

/// Check every URL in `targets`; a batch must not be empty.
pub fn validate_targets(targets: &Targets) -> Result<()> {
    if targets.is_empty() {
        return Err(Error::Validation("URL list cannot be empty".into()));
    }
    targets.iter().try_for_each(validate_url)
}

/// Check that a free-text input such as a prompt or query is not blank.
pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}
