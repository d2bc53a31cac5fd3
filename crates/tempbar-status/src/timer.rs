//! The single periodic refresh schedule.

use std::future::Future;
use std::time::Duration;

use tempbar_core::ManagedTimer;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// A live periodic timer running on the Tokio runtime.
///
/// The first tick fires one full period after creation. Ticks of one timer
/// never overlap: the next tick waits for the previous callback, and ticks
/// missed meanwhile are skipped. Dropping the timer cancels it.
#[derive(Debug)]
pub struct ActiveTimer {
    id: u64,
    period: Duration,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl ActiveTimer {
    /// Spawn a timer calling `on_tick` every `period`.
    ///
    /// The callback returns `false` to end the timer. Returns `None` when
    /// called outside a Tokio runtime.
    pub fn spawn<F, Fut>(id: u64, period: Duration, mut on_tick: F) -> Option<Self>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Cannot schedule refresh timer: {}", e);
                return None;
            }
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let first_tick = Instant::now() + period;

        let task = handle.spawn(async move {
            let mut interval = tokio::time::interval_at(first_tick, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if !on_tick().await {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Refresh timer #{} finished", id);
        });

        Some(Self {
            id,
            period,
            token,
            task,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }

    /// Handle for the host's lifecycle-bound cleanup.
    pub fn managed(&self) -> ManagedTimer {
        ManagedTimer::new(format!("weather-refresh-{}", self.id), self.token.clone())
    }

    pub fn cancel(self) {
        tracing::debug!("Cancelling refresh timer #{} ({:?})", self.id, self.period);
    }
}

impl Drop for ActiveTimer {
    fn drop(&mut self) {
        self.token.cancel();
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_timer(period: Duration, ticks: Arc<AtomicUsize>) -> ActiveTimer {
        ActiveTimer::spawn(1, period, move || {
            let ticks = ticks.clone();
            async move {
                ticks.fetch_add(1, Ordering::SeqCst);
                true
            }
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = counting_timer(Duration::from_secs(60), ticks.clone());

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = counting_timer(Duration::from_secs(10), ticks.clone());
        let managed = timer.managed();

        tokio::time::sleep(Duration::from_secs(15)).await;
        timer.cancel();
        assert!(!managed.is_active());

        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_cancellation_stops_ticks() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = counting_timer(Duration::from_secs(10), ticks.clone());

        timer.managed().cancel();
        tokio::time::sleep(Duration::from_secs(100)).await;

        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(!timer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_can_end_timer() {
        let timer = ActiveTimer::spawn(7, Duration::from_secs(1), || async { false }).unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!timer.is_active());
        assert_eq!(timer.id(), 7);
    }

    #[test]
    fn test_spawn_outside_runtime_is_none() {
        assert!(ActiveTimer::spawn(1, Duration::from_secs(1), || async { true }).is_none());
    }
}
