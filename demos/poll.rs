//! Polling Example
//!
//! Registers a scripted CAD backend, instantiates it by name, and runs its
//! monitoring loop on a background task.
//!
//! # Key Concepts Demonstrated
//!
//! ## 1. Name-based instantiation
//!
//! Backends are registered with a constructor under a name. The caller only
//! knows the name and the configuration map, never the concrete type.
//!
//! ## 2. Change-driven callbacks
//!
//! The loop polls on a fixed interval and calls back only for calls that are
//! new or changed since the previous poll.
//!
//! ## 3. Cooperative termination
//!
//! `MonitorTask::stop` raises the termination flag; the loop wakes from its
//! sleep, returns, and hands the monitor back.
//!
//! Run with `cargo run --example poll --features test-harness`.

use std::{collections::HashMap, time::Duration};

use cad_monitor::{testing::ScriptedMonitor, *};

fn scripted_backend() -> ScriptedMonitor {
    let mut monitor = ScriptedMonitor::new();
    let stroke = CallStatus::new("24-0117")
        .with_call_type("MEDICAL")
        .with_location("5th Ave & Pine")
        .with_status("PENDING");
    monitor.push_snapshot([stroke.clone()]);
    monitor.push_snapshot([
        stroke.clone().with_status("DISPATCHED").add_unit("M12"),
        CallStatus::new("24-0118")
            .with_call_type("FIRE")
            .with_location("Harbor Rd 9"),
    ]);
    monitor
}

#[tokio::main]
pub async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = MonitorRegistry::new();
    registry.register("scripted", scripted_backend);

    let values = HashMap::from([
        ("username".to_string(), "dispatch".to_string()),
        ("password".to_string(), "secret".to_string()),
        ("debug".to_string(), "true".to_string()),
    ]);
    let mut monitor = registry.instantiate_with("scripted", &values)?;
    monitor.login("dispatch", "secret").await?;

    let config = PollConfig::default()
        .with_interval(Duration::from_millis(50))
        .with_min_interval(Duration::from_millis(10));
    let task = MonitorTask::spawn_with(
        monitor,
        |call| {
            println!(
                "{} {} at {} [{}] units: {:?}",
                call.id,
                call.call_type.as_deref().unwrap_or("?"),
                call.location.as_deref().unwrap_or("?"),
                call.status.as_deref().unwrap_or("-"),
                call.units
            );
            Ok(())
        },
        &config,
    );

    tokio::time::sleep(Duration::from_millis(200)).await;

    let (mut monitor, result) = task.stop().await?;
    result?;
    monitor.keep_alive().await?;

    println!("Done");
    Ok(())
}
