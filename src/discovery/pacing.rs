//! Cancellable delays between requests

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for `duration` unless cancelled first
///
/// # Returns
///
/// `true` if the full delay elapsed, `false` if cancellation cut it short
pub async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    if duration.is_zero() {
        return !cancel.is_cancelled();
    }

    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}

/// Picks the randomized pause between two queries
pub fn jitter_delay(pacing: &PacingConfig) -> Duration {
    let millis = if pacing.jitter_max_ms <= pacing.jitter_min_ms {
        pacing.jitter_min_ms
    } else {
        rand::thread_rng().gen_range(pacing.jitter_min_ms..=pacing.jitter_max_ms)
    };
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_within_bounds() {
        let pacing = PacingConfig {
            jitter_min_ms: 20,
            jitter_max_ms: 40,
            ..PacingConfig::default()
        };
        for _ in 0..100 {
            let delay = jitter_delay(&pacing);
            assert!(delay >= Duration::from_millis(20));
            assert!(delay <= Duration::from_millis(40));
        }
    }

    #[test]
    fn test_jitter_fixed_when_bounds_equal() {
        let pacing = PacingConfig {
            jitter_min_ms: 15,
            jitter_max_ms: 15,
            ..PacingConfig::default()
        };
        assert_eq!(jitter_delay(&pacing), Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_sleep_completes() {
        let cancel = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::from_millis(5), &cancel).await);
    }

    #[tokio::test]
    async fn test_sleep_interrupted_by_cancel() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let started = std::time::Instant::now();
        assert!(!sleep_or_cancel(Duration::from_secs(30), &cancel).await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_sleep_reports_cancellation() {
        let cancel = CancellationToken::new();
        assert!(sleep_or_cancel(Duration::ZERO, &cancel).await);
        cancel.cancel();
        assert!(!sleep_or_cancel(Duration::ZERO, &cancel).await);
    }
}
