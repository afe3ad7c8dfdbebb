use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;

use crate::{CallStatus, Poller, Result, Termination};

/// Callback invoked by [`CadMonitor::monitor`] for every new or updated call.
///
/// Returning an error aborts the monitor loop; the error is handed back to
/// the caller of `monitor` unchanged.
pub type CallCallback<'a> = dyn FnMut(&CallStatus) -> Result<()> + Send + 'a;

/// Capability set every CAD backend has to provide.
///
/// A monitor goes through a simple lifecycle:
///
/// 1. it's created, usually by a [`MonitorRegistry`](crate::MonitorRegistry)
///    constructor, in an unconfigured state,
/// 2. [`configure_from_values`](Self::configure_from_values) fills in the
///    backend specific settings,
/// 3. [`login`](Self::login) opens a session,
/// 4. the caller either queries the backend directly or hands control to
///    [`monitor`](Self::monitor) until the termination flag is raised.
///
/// Any session-bound operation may fail with [`Error::LoggedOut`], meaning
/// the session is gone and `login` has to be called again before retrying.
/// Other failures are reported with the remaining [`Error`] variants.
///
/// The trait is object safe, so backends are usually handled as
/// `Box<dyn CadMonitor>`. Implement it with [`async_trait`](crate::async_trait):
///
/// ```rust,ignore
/// #[cad_monitor::async_trait]
/// impl CadMonitor for AcmeCad {
///     async fn login(&mut self, username: &str, password: &str) -> Result<()> {
///         self.token = Some(self.client.authenticate(username, password).await?);
///         Ok(())
///     }
///     // ...
/// }
/// ```
///
/// [`Error::LoggedOut`]: crate::Error::LoggedOut
/// [`Error`]: crate::Error
#[async_trait]
pub trait CadMonitor: Send {
    /// Populate backend specific settings from a string map.
    ///
    /// Fails with [`Error::MissingConfig`](crate::Error::MissingConfig) or
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig). Whether unknown
    /// keys are ignored or rejected is up to the backend; see
    /// [`ConfigValues::ensure_known`](crate::ConfigValues::ensure_known).
    fn configure_from_values(&mut self, values: &HashMap<String, String>) -> Result<()>;

    /// Authenticate against the CAD system.
    ///
    /// Must be safe to call again after the session was lost.
    async fn login(&mut self, username: &str, password: &str) -> Result<()>;

    /// URLs or identifiers of all currently active calls.
    async fn active_calls(&mut self) -> Result<Vec<String>>;

    /// Status of all active and unassigned calls, keyed by call id.
    async fn active_and_unassigned_calls(&mut self) -> Result<HashMap<String, CallStatus>>;

    /// Status of a single call.
    ///
    /// `key` is an opaque correlation token whose meaning belongs to the
    /// backend; it's passed through untouched.
    async fn status(&mut self, key: &[u8], id: &str) -> Result<CallStatus>;

    /// Status of the call referenced by `url`.
    async fn status_from_url(&mut self, url: &str) -> Result<CallStatus>;

    /// Calls cleared on `date`, mapped to a backend defined descriptor.
    async fn cleared_calls(&mut self, date: &str) -> Result<HashMap<String, String>>;

    fn set_debug(&mut self, debug: bool);

    /// Keep the current session alive (heartbeat, token refresh...).
    ///
    /// A failure means the session can't be sustained and the caller should
    /// log in again.
    async fn keep_alive(&mut self) -> Result<()>;

    /// Termination flag shared with whoever needs to stop [`monitor`](Self::monitor).
    fn termination(&self) -> &Termination;

    #[inline]
    fn terminate_monitor(&self) -> bool {
        self.termination().is_set()
    }

    #[inline]
    fn set_terminate_monitor(&self, terminate: bool) {
        self.termination().set(terminate)
    }

    /// Run the monitoring loop until termination is requested.
    ///
    /// Polls the backend every `interval` and calls `callback` once for every
    /// call that is new or changed since the previous poll. The loop
    ///
    /// - checks the termination flag before each poll and returns `Ok(())`
    ///   once it is set, at the latest one poll cycle after the request,
    /// - returns the callback's error as soon as the callback fails, without
    ///   invoking it again,
    /// - returns the backend error when polling fails.
    ///
    /// The default implementation drives [`Poller::run`] on top of
    /// [`active_and_unassigned_calls`](Self::active_and_unassigned_calls).
    /// Backends with a push or long-poll API may override it, as long as the
    /// contract above still holds.
    async fn monitor(&mut self, callback: &mut CallCallback<'_>, interval: Duration) -> Result<()> {
        Poller::new().run(self, callback, interval).await
    }
}
