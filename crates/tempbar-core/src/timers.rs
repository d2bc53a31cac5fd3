//! Host-side registry that ties plugin timers to the host lifecycle.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// A timer handle whose cancellation the host guarantees on teardown.
#[derive(Debug, Clone)]
pub struct ManagedTimer {
    label: String,
    token: CancellationToken,
}

impl ManagedTimer {
    pub fn new(label: impl Into<String>, token: CancellationToken) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Registration side of the host's timer cleanup facility.
pub trait TimerRegistry: Send + Sync {
    fn register_timer(&self, timer: ManagedTimer);
}

/// Default registry: keeps handles until they are cancelled or released.
#[derive(Debug, Default)]
pub struct ManagedTimers {
    timers: Mutex<Vec<ManagedTimer>>,
}

impl ManagedTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered timers that have not been cancelled.
    pub fn active_count(&self) -> usize {
        self.timers.lock().iter().filter(|t| t.is_active()).count()
    }

    /// Cancel every registered timer. Returns how many were still active.
    pub fn release_all(&self) -> usize {
        let timers = std::mem::take(&mut *self.timers.lock());
        let mut released = 0;
        for timer in timers {
            if timer.is_active() {
                tracing::debug!("Releasing timer: {}", timer.label());
                timer.cancel();
                released += 1;
            }
        }
        released
    }
}

impl TimerRegistry for ManagedTimers {
    fn register_timer(&self, timer: ManagedTimer) {
        let mut timers = self.timers.lock();
        timers.retain(ManagedTimer::is_active);
        tracing::debug!(
            "Registered timer: {} ({} already active)",
            timer.label(),
            timers.len()
        );
        timers.push(timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_release() {
        let registry = ManagedTimers::new();
        let first = CancellationToken::new();
        let second = CancellationToken::new();

        registry.register_timer(ManagedTimer::new("first", first.clone()));
        registry.register_timer(ManagedTimer::new("second", second.clone()));
        assert_eq!(registry.active_count(), 2);

        assert_eq!(registry.release_all(), 2);
        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn test_cancelled_timers_are_pruned() {
        let registry = ManagedTimers::new();
        let old = CancellationToken::new();
        registry.register_timer(ManagedTimer::new("old", old.clone()));

        old.cancel();
        assert_eq!(registry.active_count(), 0);

        registry.register_timer(ManagedTimer::new("new", CancellationToken::new()));
        assert_eq!(registry.active_count(), 1);
        assert_eq!(registry.timers.lock().len(), 1);
        assert_eq!(registry.release_all(), 1);
    }
}
