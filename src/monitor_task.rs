use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{CadMonitor, CallStatus, PollConfig, Result, Termination};

/// What a finished monitor task hands back: the monitor itself and the
/// result of its loop.
pub type MonitorOutcome = (Box<dyn CadMonitor>, Result<()>);

/// A [`CadMonitor::monitor`] loop running on its own tokio task.
///
/// The task owns the monitor while it runs. [`stop`](Self::stop) raises the
/// termination flag and waits for the loop to return; [`join`](Self::join)
/// just waits. Both give the monitor back so the caller can log in again,
/// query it, or start another loop (after clearing the flag).
///
/// ```rust,ignore
/// let task = MonitorTask::spawn(monitor, |call| {
///     tracing::info!(call = %call.id, "call updated");
///     Ok(())
/// }, Duration::from_secs(30));
///
/// // ... later
/// let (monitor, result) = task.stop().await?;
/// ```
pub struct MonitorTask {
    termination: Termination,
    handle: JoinHandle<MonitorOutcome>,
}

impl MonitorTask {
    pub fn spawn<F>(mut monitor: Box<dyn CadMonitor>, mut callback: F, interval: Duration) -> Self
    where
        F: FnMut(&CallStatus) -> Result<()> + Send + 'static,
    {
        let termination = monitor.termination().clone();
        let handle = tokio::spawn(async move {
            let result = monitor.monitor(&mut callback, interval).await;
            (monitor, result)
        });
        Self {
            termination,
            handle,
        }
    }

    /// Spawn using the interval of `config`.
    pub fn spawn_with<F>(monitor: Box<dyn CadMonitor>, callback: F, config: &PollConfig) -> Self
    where
        F: FnMut(&CallStatus) -> Result<()> + Send + 'static,
    {
        Self::spawn(monitor, callback, config.effective_interval())
    }

    /// Termination flag of the running monitor.
    pub fn termination(&self) -> &Termination {
        &self.termination
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request termination and wait for the loop to return.
    ///
    /// The flag stays raised on the returned monitor.
    pub async fn stop(self) -> Result<MonitorOutcome> {
        debug!("Stopping monitor task");
        self.termination.set(true);
        self.join().await
    }

    /// Wait for the loop to return on its own (termination requested
    /// elsewhere, callback or backend error).
    ///
    /// Fails with [`Error::TaskJoin`](crate::Error::TaskJoin) if the task panicked.
    pub async fn join(self) -> Result<MonitorOutcome> {
        Ok(self.handle.await?)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use super::MonitorTask;
    use crate::{CadMonitor, CallStatus, Error, PollConfig, testing::ScriptedMonitor};

    async fn logged_in() -> ScriptedMonitor {
        let mut monitor = ScriptedMonitor::new().with_credentials("dispatch", "secret");
        monitor.login("dispatch", "secret").await.unwrap();
        monitor
    }

    #[tokio::test]
    async fn test_stop_returns_monitor() {
        let mut monitor = logged_in().await;
        monitor.push_snapshot([CallStatus::new("c-1")]);

        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let task = MonitorTask::spawn(
            Box::new(monitor),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::from_millis(5),
        );

        while count.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert!(!task.is_finished());

        let (mut monitor, result) = task.stop().await.unwrap();
        assert!(result.is_ok());
        assert!(monitor.terminate_monitor());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // The session survives the loop.
        assert!(monitor.keep_alive().await.is_ok());
    }

    #[tokio::test]
    async fn test_join_reports_loop_error() {
        let mut monitor = logged_in().await;
        monitor.expire_session();

        let task = MonitorTask::spawn(Box::new(monitor), |_| Ok(()), Duration::from_millis(5));
        let (_, result) = task.join().await.unwrap();
        assert!(matches!(result, Err(Error::LoggedOut)));
    }

    #[tokio::test]
    async fn test_external_termination() {
        let monitor = logged_in().await;
        let task = MonitorTask::spawn_with(
            Box::new(monitor),
            |_| Ok(()),
            &PollConfig::default().with_interval(Duration::from_secs(60)),
        );

        task.termination().set(true);
        let (_, result) = tokio::time::timeout(Duration::from_secs(5), task.join())
            .await
            .expect("loop should stop within one cycle")
            .unwrap();
        assert!(result.is_ok());
    }
}
