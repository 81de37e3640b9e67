//! Bounded per-step retry for resolution steps.
//!
//! Each step gets its own attempt budget. A failed attempt re-runs only that
//! step; steps that already succeeded are never repeated.

use crate::config::SupportConfig;
use crate::error::SupportError;
use crate::types::ResolveStep;
use std::future::Future;
use std::time::Duration;

/// Attempt ceiling and back-off for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Build the policy configured for the support site.
    pub fn from_config(config: &SupportConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// Run `op` until it succeeds, fails terminally, or runs out of attempts.
///
/// `op` receives the 1-based attempt number. Errors for which
/// [`SupportError::is_retryable`] is false are returned unchanged on the
/// spot.
///
/// # Errors
///
/// Returns [`SupportError::RetriesExhausted`] after `max_attempts`
/// retryable failures.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    step: ResolveStep,
    mut op: F,
) -> Result<T, SupportError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, SupportError>>,
{
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    %step,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Error: {e}"
                );
                last_error = e.to_string();
                if attempt < policy.max_attempts && !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    tracing::error!(
        %step,
        "Repeated issues loading page elements, closing. Attempts: {}",
        policy.max_attempts
    );
    Err(SupportError::RetriesExhausted {
        step,
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn first_success_runs_once() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(3), ResolveStep::OpenDriversTab, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, SupportError>("clicked") }
        })
        .await;
        assert_eq!(result.expect("success"), "clicked");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_on_a_later_attempt() {
        let result = with_retry(&fast_policy(3), ResolveStep::FilterCategory, |attempt| async move {
            if attempt < 3 {
                Err(SupportError::Page("not rendered yet".into()))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(result.expect("third attempt succeeds"), 3);
    }

    #[tokio::test]
    async fn gives_up_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> =
            with_retry(&fast_policy(3), ResolveStep::ReadDownloadLink, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SupportError::Page("link missing".into())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            SupportError::RetriesExhausted {
                step,
                attempts,
                last_error,
            } => {
                assert_eq!(step, ResolveStep::ReadDownloadLink);
                assert_eq!(attempts, 3);
                assert!(last_error.contains("link missing"));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn terminal_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> =
            with_retry(&fast_policy(3), ResolveStep::OpenSupportPage, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(SupportError::UnknownServiceTag("ABC1234".into())) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result.unwrap_err(),
            SupportError::UnknownServiceTag(_)
        ));
    }

    #[test]
    fn policy_from_config() {
        let config = SupportConfig {
            max_attempts: 5,
            retry_delay_ms: 20,
            ..Default::default()
        };
        let policy = RetryPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(20));
    }
}
