// CitaSync Infrastructure - Robot Dispatcher
// Implements: RobotExecutor

pub mod dispatcher;
pub mod resolver;
pub mod robot_env;

pub use dispatcher::{RobotDispatcher, RobotDispatcherConfig};
pub use resolver::{CandidateKind, RobotCandidate};
pub use robot_env::{RewriteRule, RobotEnvBuilder};
