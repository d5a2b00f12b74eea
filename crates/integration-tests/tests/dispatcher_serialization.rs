//! Dispatcher serialization tests
//!
//! The legacy desktop session tolerates exactly one robot at a time.
//! These tests run real subprocesses against a temporary robots
//! directory and assert that concurrent dispatch calls never overlap.

use citasync_core::port::time_provider::SystemTimeProvider;
use citasync_core::port::{DispatchError, DispatchRequest, RobotExecutor};
use citasync_infra_robot::{RobotDispatcher, RobotDispatcherConfig};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn dispatcher(dir: &TempDir) -> Arc<RobotDispatcher> {
    let config = RobotDispatcherConfig::new(dir.path()).interpreter("sh");
    Arc::new(RobotDispatcher::new(config, Arc::new(SystemTimeProvider)))
}

/// Two concurrent dispatches of an intentionally slow robot: the second
/// start instant must come after the first end instant.
#[tokio::test]
async fn test_concurrent_dispatches_never_overlap() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("exec.log");

    let script = format!(
        "echo \"START $(date +%s%N)\" >> {log}\n\
         sleep 0.3\n\
         echo \"END $(date +%s%N)\" >> {log}\n",
        log = log.display()
    );
    fs::write(dir.path().join("slow.py"), script).unwrap();

    let dispatcher = dispatcher(&dir);
    let first = {
        let d = dispatcher.clone();
        tokio::spawn(
            async move { d.dispatch(&DispatchRequest::new("slow", serde_json::Value::Null)).await },
        )
    };
    let second = {
        let d = dispatcher.clone();
        tokio::spawn(
            async move { d.dispatch(&DispatchRequest::new("slow", serde_json::Value::Null)).await },
        )
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let contents = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4, "expected two start/end pairs: {contents}");

    // Serialized execution appends START, END, START, END in order
    let markers: Vec<&str> = lines
        .iter()
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(markers, vec!["START", "END", "START", "END"]);

    let stamps: Vec<i128> = lines
        .iter()
        .map(|l| l.split_whitespace().nth(1).unwrap().parse().unwrap())
        .collect();
    let (first_end, second_start) = (stamps[1], stamps[2]);
    assert!(
        first_end <= second_start,
        "robot executions overlapped: first ended {first_end}, second started {second_start}"
    );
}

/// A failed robot releases the gate: the next dispatch still runs.
#[tokio::test]
async fn test_gate_is_released_after_failure() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.py"), "exit 1\n").unwrap();
    fs::write(dir.path().join("ok.py"), "echo fine\n").unwrap();

    let dispatcher = dispatcher(&dir);

    let failed = dispatcher
        .dispatch(&DispatchRequest::new("broken", serde_json::Value::Null))
        .await;
    assert!(matches!(failed, Err(DispatchError::RobotFailed { .. })));

    let outcome = dispatcher
        .dispatch(&DispatchRequest::new("ok", serde_json::Value::Null))
        .await
        .unwrap();
    assert!(outcome.stdout.contains("fine"));
}

/// A timed-out robot releases the gate too.
#[tokio::test]
async fn test_gate_is_released_after_timeout() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("slow.py"), "sleep 5\n").unwrap();
    fs::write(dir.path().join("ok.py"), "echo fine\n").unwrap();

    let config = RobotDispatcherConfig::new(dir.path())
        .interpreter("sh")
        .timeout(std::time::Duration::from_millis(100));
    let dispatcher = RobotDispatcher::new(config, Arc::new(SystemTimeProvider));

    let timed_out = dispatcher
        .dispatch(&DispatchRequest::new("slow", serde_json::Value::Null))
        .await;
    assert!(matches!(timed_out, Err(DispatchError::Timeout { .. })));

    let outcome = dispatcher
        .dispatch(&DispatchRequest::new("ok", serde_json::Value::Null))
        .await
        .unwrap();
    assert!(outcome.stdout.contains("fine"));
}
