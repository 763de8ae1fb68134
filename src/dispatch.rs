use std::future::Future;

use tracing::warn;

use crate::errors::{ApiError, Result};

/// Whether a downstream call may fail the request. The distinction from
/// the error-handling design is carried by this type instead of scattered
/// catch blocks: the email channel is required for form intake, the issue
/// tracker is best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    Required,
    BestEffort,
}

/// Run a downstream call under a policy. Best-effort failures are logged
/// and reported as `None`; required failures become a 500.
pub async fn dispatch<T, F>(policy: DispatchPolicy, channel: &'static str, call: F) -> Result<Option<T>>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match call.await {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(channel, error = %err, "downstream call failed");
            match policy {
                DispatchPolicy::Required => Err(ApiError::DispatchFailed(channel)),
                DispatchPolicy::BestEffort => Ok(None),
            }
        }
    }
}
