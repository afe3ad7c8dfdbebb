use std::sync::Arc;

/// Errors surfaced by CAD monitors and the monitor registry.
///
/// [`Error::LoggedOut`] is the one variant callers are expected to branch on:
/// it means the session is gone and a fresh [`login`](crate::CadMonitor::login)
/// is needed before retrying.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required configuration value '{key}'")]
    MissingConfig { key: Arc<str> },

    #[error("Invalid configuration value '{key}': {reason}")]
    InvalidConfig { key: Arc<str>, reason: Arc<str> },

    #[error("Authentication failed: {0}")]
    Authentication(Arc<str>),

    #[error("logged out")]
    LoggedOut,

    #[error("unable to locate cad monitor {0}")]
    MonitorNotFound(Arc<str>),

    #[error("Call '{0}' not found")]
    CallNotFound(Arc<str>),

    #[error("CAD backend error: {0}")]
    Backend(Arc<str>),

    #[error("Error external to the monitor occurred: {0}")]
    External(Arc<str>),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("Monitor task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl Error {
    /// Whether the caller has to log in again before retrying.
    #[inline]
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::LoggedOut)
    }

    pub(crate) fn invalid_config(key: &str, reason: impl Into<Arc<str>>) -> Self {
        Error::InvalidConfig {
            key: Arc::from(key),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_config(key: &str) -> Self {
        Error::MissingConfig {
            key: Arc::from(key),
        }
    }
}
