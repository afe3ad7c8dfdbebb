//! In-memory CAD backend for exercising code written against [`CadMonitor`].
//!
//! Enable with the `test-harness` feature:
//!
//! ```toml
//! [dev-dependencies]
//! cad-monitor = { version = "0.1", features = ["test-harness"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut monitor = ScriptedMonitor::new().with_credentials("dispatch", "secret");
//! monitor.push_snapshot([CallStatus::new("c-1").with_status("PENDING")]);
//! monitor.push_failure(Error::LoggedOut);
//!
//! monitor.login("dispatch", "secret").await?;
//! assert_eq!(monitor.active_calls().await?, ["c-1"]);
//! ```
//!
//! [`CadMonitor`]: crate::CadMonitor

mod scripted_monitor;

pub use scripted_monitor::ScriptedMonitor;
