//! CitaSync Daemon - Main Entry Point
//!
//! Composition root: wires the robot dispatcher and runs the poll loop
//! that periodically triggers the listing robot. The robot itself pushes
//! the observed snapshot back through the API layer, which applies the
//! window sync; the loop here only decides *when* to poll.

use anyhow::Result;
use citasync_core::port::time_provider::SystemTimeProvider;
use citasync_core::port::{DispatchRequest, RobotExecutor};
use citasync_infra_robot::{RobotDispatcher, RobotDispatcherConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_ROBOTS_DIR: &str = "~/.citasync/robots";
const DEFAULT_SYNC_ROBOT: &str = "robot_listar_citas";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("CITASYNC_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("citasync=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("CitaSync daemon v{} starting...", VERSION);

    // 2. Load configuration
    let robots_dir = std::env::var("CITASYNC_ROBOTS_DIR")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_ROBOTS_DIR).into_owned());

    let env_file = std::env::var("CITASYNC_ENV_FILE").ok();

    let sync_robot =
        std::env::var("CITASYNC_SYNC_ROBOT").unwrap_or_else(|_| DEFAULT_SYNC_ROBOT.to_string());

    let poll_interval_secs: u64 = std::env::var("CITASYNC_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

    info!(
        robots_dir = %robots_dir,
        sync_robot = %sync_robot,
        poll_interval_secs = poll_interval_secs,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let mut config = RobotDispatcherConfig::new(robots_dir);
    if let Some(env_file) = env_file {
        config = config.env_file(env_file);
    }
    let dispatcher = Arc::new(RobotDispatcher::new(config, Arc::new(SystemTimeProvider)));

    // 4. Run the poll loop until shutdown
    let poll_dispatcher = dispatcher.clone();
    let poll_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(poll_interval_secs));
        loop {
            // First tick fires immediately: poll once on startup
            ticker.tick().await;
            trigger_sync_robot(poll_dispatcher.as_ref(), &sync_robot).await;
        }
    });

    info!("Daemon ready. Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");
    poll_handle.abort();

    Ok(())
}

/// One poll: dispatch the listing robot and log the outcome. Failures are
/// logged and swallowed here - the next tick simply tries again.
async fn trigger_sync_robot(dispatcher: &RobotDispatcher, robot: &str) {
    info!(robot = %robot, "Triggering sync robot");

    let request = DispatchRequest::new(robot, serde_json::Value::Null);
    match dispatcher.dispatch(&request).await {
        Ok(outcome) => {
            info!(
                robot = %outcome.robot,
                duration_ms = outcome.duration_ms,
                "Sync robot completed"
            );
        }
        Err(e) => {
            error!(robot = %robot, error = %e, "Sync robot failed");
        }
    }
}
