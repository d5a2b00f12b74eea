// Robot Executor Port
// Abstraction for triggering external desktop-automation robots

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request to run one robot: a robot name plus an opaque payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub robot: String,
    pub payload: serde_json::Value,
}

impl DispatchRequest {
    pub fn new(robot: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            robot: robot.into(),
            payload,
        }
    }
}

/// Terminal outcome of a completed dispatch.
///
/// Failures never come back through this struct; they surface as
/// `DispatchError` so callers cannot mistake them for success.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub robot: String,
    pub stdout: String,
    pub duration_ms: i64,
}

/// Dispatch errors
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Robot '{0}' not found")]
    NotFound(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Robot '{robot}' failed with exit code {exit_code:?}")]
    RobotFailed {
        robot: String,
        exit_code: Option<i32>,
    },

    #[error("Robot '{robot}' timed out after {timeout_secs}s")]
    Timeout { robot: String, timeout_secs: u64 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Robot Executor trait
///
/// Implementations:
/// - RobotDispatcher (infra-robot): spawns the external automation process
/// - MockRobotExecutor (tests): canned behavior
///
/// Implementations must serialize execution: the external system being
/// automated is a single-seat desktop session, so at most one robot may
/// run at any instant.
#[async_trait]
pub trait RobotExecutor: Send + Sync {
    /// Run one robot to completion and return its outcome.
    ///
    /// Exactly one attempt per call; retry policy belongs to the caller.
    ///
    /// # Errors
    /// - DispatchError::NotFound if no executable resolves for the robot name
    /// - DispatchError::SpawnFailed if the process cannot be started
    /// - DispatchError::RobotFailed if the process exits non-zero
    /// - DispatchError::Timeout if execution exceeds the timeout ceiling
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchOutcome, DispatchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Always succeed with the given stdout
        Success(String),
        /// Always fail with a non-zero exit
        Fail,
        /// Always report the robot as unresolvable
        NotFound,
    }

    /// Mock Robot Executor for testing
    pub struct MockRobotExecutor {
        behavior: MockBehavior,
        requests: Arc<Mutex<Vec<DispatchRequest>>>,
    }

    impl MockRobotExecutor {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Success("mock output".to_string()))
        }

        pub fn new_fail() -> Self {
            Self::new(MockBehavior::Fail)
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Requests observed so far (for asserting payload shape)
        pub fn requests(&self) -> Vec<DispatchRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RobotExecutor for MockRobotExecutor {
        async fn dispatch(
            &self,
            request: &DispatchRequest,
        ) -> Result<DispatchOutcome, DispatchError> {
            self.requests.lock().unwrap().push(request.clone());

            match &self.behavior {
                MockBehavior::Success(stdout) => Ok(DispatchOutcome {
                    robot: request.robot.clone(),
                    stdout: stdout.clone(),
                    duration_ms: 100,
                }),
                MockBehavior::Fail => Err(DispatchError::RobotFailed {
                    robot: request.robot.clone(),
                    exit_code: Some(1),
                }),
                MockBehavior::NotFound => Err(DispatchError::NotFound(request.robot.clone())),
            }
        }
    }
}
