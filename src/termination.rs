use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::sync::Notify;

/// Shared termination flag of a monitor loop.
///
/// A running [`CadMonitor::monitor`](crate::CadMonitor::monitor) holds the
/// monitor mutably, so the flag lives behind a cloneable handle: take a clone
/// before starting the loop and call [`set(true)`](Self::set) from anywhere to
/// stop it. The loop wakes from its inter-poll sleep as soon as the flag is
/// raised.
///
/// Clearing the flag again re-arms the monitor for another run.
#[derive(Debug, Clone, Default)]
pub struct Termination {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    flag: AtomicBool,
    notify: Notify,
}

impl Termination {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.inner.flag.load(Ordering::Acquire)
    }

    pub fn set(&self, terminate: bool) {
        self.inner.flag.store(terminate, Ordering::Release);
        if terminate {
            self.inner.notify.notify_waiters();
        }
    }

    /// Sleep for `duration` or until termination is requested, whichever
    /// comes first. Returns whether termination is requested on wake-up.
    pub async fn sleep(&self, duration: Duration) -> bool {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before reading the flag so a concurrent `set(true)` can't slip between.
        notified.as_mut().enable();
        if self.is_set() {
            return true;
        }
        tokio::select! {
            _ = &mut notified => {},
            _ = tokio::time::sleep(duration) => {},
        }
        self.is_set()
    }

    /// Whether both handles control the same flag.
    pub fn same_as(&self, other: &Termination) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::Termination;

    #[test]
    fn test_set_and_clear() {
        let t = Termination::new();
        assert!(!t.is_set());
        let other = t.clone();
        other.set(true);
        assert!(t.is_set());
        t.set(false);
        assert!(!other.is_set());
        assert!(t.same_as(&other));
        assert!(!t.same_as(&Termination::new()));
    }

    #[tokio::test]
    async fn test_sleep_returns_immediately_when_already_set() {
        let t = Termination::new();
        t.set(true);
        let start = Instant::now();
        assert!(t.sleep(Duration::from_secs(30)).await);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sleep_wakes_on_set() {
        let t = Termination::new();
        let remote = t.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            remote.set(true);
        });
        let woke = tokio::time::timeout(Duration::from_secs(5), t.sleep(Duration::from_secs(60)))
            .await
            .expect("sleep should be interrupted");
        assert!(woke);
    }

    #[tokio::test]
    async fn test_sleep_runs_out() {
        let t = Termination::new();
        assert!(!t.sleep(Duration::from_millis(5)).await);
    }
}
