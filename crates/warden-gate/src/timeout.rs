//! Labeled timeout enforcement for asynchronous I/O.
//!
//! This bounds suspension points only. A synchronous CPU-bound computation
//! on the same task cannot be preempted by this race; regex and diff work
//! rely on static pre-validation and cooperative deadline checks instead.

use std::future::Future;
use std::time::Duration;

use crate::error::GateError;

/// Race a future against a timer.
///
/// # Errors
///
/// Returns `GateError::Timeout` carrying `label` when the budget expires
/// before the future completes. Note that a timed-out *write* may already
/// have reached the disk: callers must treat the target as unknown state
/// and re-verify with a read, not assume it unchanged.
pub async fn enforce_timeout<F, T>(future: F, millis: u64, label: &str) -> Result<T, GateError>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_millis(millis), future)
        .await
        .map_err(|_| GateError::Timeout {
            label: label.to_string(),
            millis,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fast_future_completes() {
        let result = enforce_timeout(async { 42 }, 1_000, "answer").await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_slow_future_times_out() {
        let slow = tokio::time::sleep(Duration::from_secs(5));
        let result = enforce_timeout(slow, 10, "sleep").await;
        match result {
            Err(GateError::Timeout { label, millis }) => {
                assert_eq!(label, "sleep");
                assert_eq!(millis, 10);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
