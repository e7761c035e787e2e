// ABOUTME: Convergence poller: probe a status until it matches or attempts run out.
// ABOUTME: Sleeps go through an injected Clock so the schedule is testable.

use crate::config::WaitPolicy;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Time source for every sleep the lifecycle takes.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WaitError<E> {
    #[error("status did not reach {target} after {attempts} attempt(s)")]
    Timeout { target: String, attempts: u32 },

    #[error("status probe failed: {0}")]
    Probe(#[source] E),
}

/// Poll `probe` until it reports `target` (case-insensitive).
///
/// The first probe runs immediately. After the n-th failed probe the poller
/// sleeps `policy.delay_after(n)`, so waits grow linearly. There is no sleep
/// after the last probe. Returns the number of probes taken on success.
pub async fn await_status<P, Fut, S, E>(
    mut probe: P,
    target: &str,
    policy: &WaitPolicy,
    clock: &dyn Clock,
) -> Result<u32, WaitError<E>>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
    S: AsRef<str>,
{
    for attempt in 1..=policy.max_attempts {
        let status = probe().await.map_err(WaitError::Probe)?;
        if status.as_ref().eq_ignore_ascii_case(target) {
            tracing::debug!("Status {} reached after {} probe(s)", target, attempt);
            return Ok(attempt);
        }

        if attempt < policy.max_attempts {
            let delay = policy.delay_after(attempt);
            tracing::info!(
                "Status is {}, not yet {}, waiting {:?}",
                status.as_ref(),
                target,
                delay
            );
            clock.sleep(delay).await;
        }
    }

    Err(WaitError::Timeout {
        target: target.to_string(),
        attempts: policy.max_attempts,
    })
}
