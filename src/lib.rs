//! cad-monitor - pluggable monitors for Computer-Aided Dispatch systems
//!
//! Every CAD backend implements the [`CadMonitor`] capability set
//! (authentication, call queries, keep-alive, and a cooperative monitoring
//! loop). Backends register a constructor with a [`MonitorRegistry`] under a
//! name, and callers instantiate them by that name at runtime.
//!
//! ```rust,ignore
//! let registry = MonitorRegistry::new();
//! registry.register("acme", AcmeCad::default);
//!
//! let mut monitor = registry.instantiate_with("acme", &values)?;
//! monitor.login(&user, &password).await?;
//!
//! let task = MonitorTask::spawn(monitor, |call| {
//!     println!("{}: {:?}", call.id, call.status);
//!     Ok(())
//! }, Duration::from_secs(30));
//! ```
//!
//! See `demos/poll.rs` for a runnable example.

mod cad_monitor;
mod call_status;
mod config;
mod config_values;
mod error;
mod monitor_task;
mod poller;
mod registry;
mod termination;

#[cfg(any(test, feature = "test-harness"))]
pub mod testing;

pub use cad_monitor::{CadMonitor, CallCallback};
pub use call_status::CallStatus;
pub use config::PollConfig;
pub use config_values::ConfigValues;
pub use error::Error;
pub use monitor_task::{MonitorOutcome, MonitorTask};
pub use poller::Poller;
pub use registry::{Constructor, MonitorRegistry};
pub use termination::Termination;

pub use async_trait::async_trait;

pub type Result<T = ()> = std::result::Result<T, Error>;
