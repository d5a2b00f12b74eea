// Robot Dispatcher - serialized execution of external automation robots
//
// The legacy scheduling system is driven through a single-seat desktop
// session; two robots running at once would corrupt it. A one-permit
// semaphore owned by the dispatcher instance serializes execution, and
// `dispatch` is the only way through it. The permit is held for the full
// run and released on every path, including timeout.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{error, info};
use uuid::Uuid;

use citasync_core::port::robot_executor::{DispatchError, DispatchOutcome, DispatchRequest};
use citasync_core::port::{RobotExecutor, TimeProvider};

use crate::resolver::{self, CandidateKind, RobotCandidate};
use crate::robot_env::RobotEnvBuilder;

/// Robots may drive a slow desktop workflow; ten minutes bounds the wait.
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Interpreter for script candidates
const DEFAULT_INTERPRETER: &str = "python3";

/// Fixed specialty constant for the booking robot's positional contract
const BOOKING_SPECIALTY: &str = "Oftalmologia";

/// Robot whose invocation contract is positional arguments instead of a
/// single JSON blob
const BOOKING_ROBOT: &str = "agendar_cita";

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct RobotDispatcherConfig {
    pub robots_dir: PathBuf,
    pub env_file: Option<PathBuf>,
    pub interpreter: String,
    pub timeout: Duration,
}

impl RobotDispatcherConfig {
    pub fn new(robots_dir: impl Into<PathBuf>) -> Self {
        Self {
            robots_dir: robots_dir.into(),
            env_file: None,
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Subprocess-backed implementation of the RobotExecutor port
pub struct RobotDispatcher {
    config: RobotDispatcherConfig,
    time_provider: Arc<dyn TimeProvider>,
    // Single-seat desktop session: one robot at a time, arrival order
    // (tokio's semaphore is FIFO-fair)
    gate: Semaphore,
}

impl RobotDispatcher {
    pub fn new(config: RobotDispatcherConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            config,
            time_provider,
            gate: Semaphore::new(1),
        }
    }

    /// Map the request payload onto the robot's invocation contract.
    ///
    /// Default: one JSON-encoded string argument. The booking robot
    /// instead takes positional arguments in a fixed order.
    fn adapt_args(&self, request: &DispatchRequest) -> Result<Vec<String>, DispatchError> {
        match request.robot.as_str() {
            BOOKING_ROBOT => booking_args(&request.payload),
            _ => {
                if request.payload.is_null() {
                    return Ok(Vec::new());
                }
                let blob = serde_json::to_string(&request.payload)
                    .map_err(|e| DispatchError::InvalidPayload(e.to_string()))?;
                Ok(vec![blob])
            }
        }
    }

    fn command_for(&self, candidate: &RobotCandidate) -> Command {
        match candidate.kind {
            CandidateKind::Binary => Command::new(&candidate.path),
            CandidateKind::Script => {
                let mut cmd = Command::new(&self.config.interpreter);
                cmd.arg(&candidate.path);
                cmd
            }
        }
    }

    fn build_env(&self) -> HashMap<String, String> {
        let mut builder = RobotEnvBuilder::new();
        if let Some(env_file) = &self.config.env_file {
            builder = builder.override_file(env_file);
        }
        builder.build()
    }
}

/// Positional contract of the booking robot:
/// patient name, agenda, start time, specialty, visit type - in that order.
fn booking_args(payload: &serde_json::Value) -> Result<Vec<String>, DispatchError> {
    let field = |name: &str| {
        payload
            .get(name)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| DispatchError::InvalidPayload(format!("missing field '{name}'")))
    };

    Ok(vec![
        field("patient_name")?,
        field("agenda")?,
        field("start_time")?,
        BOOKING_SPECIALTY.to_string(),
        field("visit_type")?,
    ])
}

#[async_trait]
impl RobotExecutor for RobotDispatcher {
    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchOutcome, DispatchError> {
        let candidate = resolver::resolve(&self.config.robots_dir, &request.robot)
            .ok_or_else(|| DispatchError::NotFound(request.robot.clone()))?;
        let args = self.adapt_args(request)?;
        let env = self.build_env();

        let dispatch_id = Uuid::new_v4();

        if self.gate.available_permits() == 0 {
            info!(
                dispatch_id = %dispatch_id,
                robot = %request.robot,
                "Robot execution locked, waiting for running robot to finish"
            );
        }

        // Semaphore is never closed, but never unwrap outside tests
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| DispatchError::IoError(e.to_string()))?;

        info!(
            dispatch_id = %dispatch_id,
            robot = %request.robot,
            path = %candidate.path.display(),
            kind = ?candidate.kind,
            "Executing robot"
        );

        let started = self.time_provider.now_millis();

        let child = self
            .command_for(&candidate)
            .args(&args)
            .env_clear()
            .envs(&env)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DispatchError::SpawnFailed(e.to_string()))?;

        let output = match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(DispatchError::IoError(e.to_string())),
            Err(_) => {
                // The child keeps running; we only stop waiting for it.
                // Known limitation, see RobotExecutor docs.
                error!(
                    dispatch_id = %dispatch_id,
                    robot = %request.robot,
                    timeout_secs = self.config.timeout.as_secs(),
                    "Robot timed out"
                );
                return Err(DispatchError::Timeout {
                    robot: request.robot.clone(),
                    timeout_secs: self.config.timeout.as_secs(),
                });
            }
        };

        let duration_ms = self.time_provider.now_millis() - started;

        if !output.status.success() {
            // Full stderr goes to the log only; callers get a sanitized
            // summary
            error!(
                dispatch_id = %dispatch_id,
                robot = %request.robot,
                exit_code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Robot failed"
            );
            return Err(DispatchError::RobotFailed {
                robot: request.robot.clone(),
                exit_code: output.status.code(),
            });
        }

        info!(
            dispatch_id = %dispatch_id,
            robot = %request.robot,
            duration_ms = duration_ms,
            "Robot finished successfully"
        );

        Ok(DispatchOutcome {
            robot: request.robot.clone(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            duration_ms,
        })
    }
}
