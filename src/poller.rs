use std::{collections::HashMap, time::Duration};

use tracing::{debug, info, warn};

use crate::{CadMonitor, CallCallback, CallStatus, Error, Result};

/// Change detection and the cooperative polling loop behind
/// [`CadMonitor::monitor`].
///
/// The poller remembers the last status seen for every call. Each snapshot
/// passed to [`changes`](Self::changes) yields the calls that are new or whose
/// status differs, and ids missing from the snapshot are forgotten (a call
/// that comes back is reported again).
#[derive(Debug, Default)]
pub struct Poller {
    seen: HashMap<String, CallStatus>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// New or updated calls of `snapshot`, ordered by call id.
    pub fn changes(&mut self, snapshot: HashMap<String, CallStatus>) -> Vec<CallStatus> {
        let mut updates: Vec<(&String, &CallStatus)> = snapshot
            .iter()
            .filter(|(id, status)| self.seen.get(*id) != Some(*status))
            .collect();
        updates.sort_unstable_by(|a, b| a.0.cmp(b.0));
        let updates: Vec<CallStatus> = updates.into_iter().map(|(_, s)| s.clone()).collect();
        self.seen = snapshot;
        updates
    }

    /// Number of calls currently tracked.
    #[inline]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget everything, so the next snapshot is reported in full.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Poll `monitor` every `interval` until its termination flag is raised.
    ///
    /// Every new or updated call is handed to `callback`. A callback error
    /// stops the loop immediately and is returned as is, and so is any error
    /// from [`CadMonitor::active_and_unassigned_calls`]. Termination is checked
    /// before each poll and interrupts the sleep between polls.
    pub async fn run<M>(
        &mut self,
        monitor: &mut M,
        callback: &mut CallCallback<'_>,
        interval: Duration,
    ) -> Result<()>
    where
        M: CadMonitor + ?Sized,
    {
        let termination = monitor.termination().clone();
        info!(?interval, "Monitor loop started");

        let result = async {
            while !termination.is_set() {
                let snapshot = monitor.active_and_unassigned_calls().await?;
                let updates = self.changes(snapshot);
                debug!(updates = updates.len(), tracked = self.len(), "Poll cycle done");

                for call in &updates {
                    callback(call)?;
                }

                if interval.is_zero() {
                    tokio::task::yield_now().await;
                } else if termination.sleep(interval).await {
                    break;
                }
            }
            Ok::<_, Error>(())
        }
        .await;

        match &result {
            Ok(()) => info!("Monitor loop terminated"),
            Err(e) => warn!(error = %e, "Monitor loop aborted"),
        }
        result
    }
}
