use async_trait::async_trait;
use std::time::Duration;

/// Source of the timed waits pacing every orchestrated sequence.
///
/// A wait only suspends the calling sequence; other requests against the
/// tower (enqueueing in particular) keep being served in the meantime.
#[async_trait]
pub trait SuspensionClock: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real-time clock backed by the tokio timer.
///
/// Under a runtime with paused time (`tokio::test(start_paused = true)`) this
/// doubles as a virtual-time clock that auto-advances whenever every task is idle.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl SuspensionClock for TokioClock {
    async fn wait(&self, duration: Duration) {
        if duration.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Zero-delay clock: every wait completes after a single yield to the scheduler.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateClock;

#[async_trait]
impl SuspensionClock for ImmediateClock {
    async fn wait(&self, _duration: Duration) { tokio::task::yield_now().await; }
}
